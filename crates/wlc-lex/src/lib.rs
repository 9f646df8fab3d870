//! The W-language tokenizer: a character-at-a-time scanner that produces one
//! token at a time on demand (§4.1). There is no token list — [`Tokenizer`]
//! is pulled forward by the parser one `advance()` at a time.

mod cursor;
mod error;
mod tokenizer;

pub use error::{ExpectError, LexError};
pub use tokenizer::Tokenizer;

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(src: &str) -> Tokenizer<'_> {
        Tokenizer::new("test.w", src).unwrap()
    }

    #[test]
    fn scans_identifier() {
        let t = tok("hello");
        assert_eq!(t.current_token(), "hello");
        assert!(t.end_of_file() == false);
    }

    #[test]
    fn scans_alnum_run_as_single_token() {
        // Identifiers and numeric literals share one class (§4.1a); the
        // parser, not the lexer, decides which one this is.
        let t = tok("123abc");
        assert_eq!(t.current_token(), "123abc");
    }

    #[test]
    fn scans_relational_operator_run() {
        let t = tok("<=");
        assert_eq!(t.current_token(), "<=");
    }

    #[test]
    fn scans_arithmetic_operator_as_single_char() {
        let mut t = tok("+-");
        assert_eq!(t.current_token(), "+");
        t.advance().unwrap();
        assert_eq!(t.current_token(), "-");
    }

    #[test]
    fn scans_punctuation_including_array_forms() {
        let mut t = tok("([a,b]@^)");
        let expected = ["(", "[", "a", ",", "b", "]", "@", "^", ")"];
        for want in expected {
            assert_eq!(t.current_token(), want);
            t.advance().unwrap();
        }
        assert!(t.end_of_file());
    }

    #[test]
    fn scans_string_literal_preserving_delimiters() {
        let t = tok(r#""hello world""#);
        assert_eq!(t.current_token(), r#""hello world""#);
    }

    #[test]
    fn scans_backtick_and_single_quote_strings() {
        let mut t = tok("`a` 'b'");
        assert_eq!(t.current_token(), "`a`");
        t.advance().unwrap();
        assert_eq!(t.current_token(), "'b'");
    }

    #[test]
    fn unterminated_string_is_fatal() {
        // Tokenizer::new scans the first token eagerly, so a string that
        // never closes fails right there.
        let err = Tokenizer::new("test.w", "\"unterminated");
        assert!(matches!(err, Err(LexError::UnterminatedString(_))));
    }

    #[test]
    fn line_comment_is_discarded_and_scanning_restarts() {
        let mut t = tok("a # a comment\nb");
        assert_eq!(t.current_token(), "a");
        t.advance().unwrap();
        assert_eq!(t.current_token(), "b");
    }

    #[test]
    fn preceded_by_newline_tracks_newlines_and_eof() {
        let mut t = tok("a\nb c");
        assert!(!t.preceded_by_newline()); // nothing precedes the first token
        t.advance().unwrap();
        assert_eq!(t.current_token(), "b");
        assert!(t.preceded_by_newline());
        t.advance().unwrap();
        assert_eq!(t.current_token(), "c");
        assert!(!t.preceded_by_newline());
        t.advance().unwrap();
        assert!(t.end_of_file());
        assert!(t.preceded_by_newline());
    }

    #[test]
    fn tab_level_counts_leading_tabs_and_resets_on_newline() {
        let mut t = tok("a\n\t\tb\nc");
        assert_eq!(t.current_token(), "a");
        t.advance().unwrap();
        assert_eq!(t.current_token(), "b");
        assert_eq!(t.tab_level(), 2);
        t.advance().unwrap();
        assert_eq!(t.current_token(), "c");
        assert_eq!(t.tab_level(), 0);
    }

    #[test]
    fn peek_accept_and_expect() {
        let mut t = tok("if x");
        assert!(t.peek("if"));
        assert!(t.accept("if").unwrap());
        assert_eq!(t.current_token(), "x");
        assert!(t.expect("x").is_ok());
    }

    #[test]
    fn expect_end_accepts_semicolon_or_newline() {
        let mut t = tok("a;b\nc");
        t.advance().unwrap(); // consume 'a', land on ';'
        assert!(t.expect_end().is_ok());
        assert_eq!(t.current_token(), "b");
        t.advance().unwrap();
        assert!(t.expect_end().is_ok());
        assert_eq!(t.current_token(), "c");
    }

    #[test]
    fn unexpected_character_is_fatal() {
        let err = Tokenizer::new("test.w", "$");
        assert!(matches!(err, Err(LexError::UnexpectedChar(_, '$'))));
    }

    proptest::proptest! {
        /// For any sequence of valid tokens separated by single spaces, the
        /// tokenizer yields exactly those tokens in order (§8.1).
        #[test]
        fn lexer_round_trips_token_sequences(tokens in proptest::collection::vec(
            proptest::prop_oneof![
                "[a-zA-Z][a-zA-Z0-9]{0,6}",
                "[0-9]{1,4}",
            ],
            1..8,
        )) {
            let src = tokens.join(" ");
            let mut t = Tokenizer::new("test.w", &src).unwrap();
            for expected in &tokens {
                proptest::prop_assert_eq!(t.current_token(), expected.as_str());
                t.advance().unwrap();
            }
            proptest::prop_assert!(t.end_of_file());
        }
    }
}
