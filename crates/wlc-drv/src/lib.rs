//! The `wlc` driver: the thinnest possible shell around [`wlc_par::Parser`]
//! (§6, §10.5) — read one source file, compile it, write the assembly next
//! to it. `run` returns a process exit code directly rather than a
//! `Result`, since a missing argument is a *successful* invocation (exit
//! 0, usage text) and not an error this crate's own error type models.

mod config;
mod error;

use std::fs;
use std::path::PathBuf;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::DriverError;
use wlc_par::Parser;

/// `wlc <source-file>`: compiles a single W source file to FASM assembly.
#[derive(clap::Parser, Debug)]
#[command(name = "wlc", version, about = "Compiles a W source file to FASM assembly")]
struct Cli {
    /// Source file to compile. Omitting it prints usage and exits 0 (§6).
    source: Option<PathBuf>,

    /// Enable debug-level logging (equivalent to RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

/// Parses `argv`, runs the compile, and returns the process exit code.
/// Never panics on user input — any I/O or compile failure is reported on
/// stderr and mapped to exit code 1.
pub fn run(args: impl IntoIterator<Item = String>) -> i32 {
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    let Some(source) = cli.source else {
        print_usage();
        return 0;
    };

    let config = Config::from_input(source, cli.verbose);
    match compile_file(&config) {
        Ok(()) => 0,
        Err(Failure::Driver(e)) => {
            eprintln!("{e}");
            1
        }
        Err(Failure::Compile(e)) => {
            eprintln!("Compilation failed for file {}", e.position());
            eprintln!("{}", e.message());
            1
        }
    }
}

enum Failure {
    Driver(DriverError),
    Compile(wlc_par::CompileError),
}

fn compile_file(config: &Config) -> Result<(), Failure> {
    tracing::debug!(input = %config.input_path.display(), "reading source");
    let source = fs::read_to_string(&config.input_path).map_err(|source| {
        Failure::Driver(DriverError::ReadSource {
            path: config.input_path.clone(),
            source,
        })
    })?;

    let parser = Parser::new(config.input_path.clone(), &source).map_err(Failure::Compile)?;
    let assembly = parser.compile().map_err(Failure::Compile)?;

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| {
                Failure::Driver(DriverError::WriteOutput {
                    path: config.output_path.clone(),
                    source,
                })
            })?;
        }
    }
    tracing::debug!(output = %config.output_path.display(), "writing assembly");
    fs::write(&config.output_path, assembly).map_err(|source| {
        Failure::Driver(DriverError::WriteOutput {
            path: config.output_path.clone(),
            source,
        })
    })
}

fn print_usage() {
    println!("Usage: wlc <source-file>");
    println!();
    println!("Compiles a single W source file to FASM assembly, writing it");
    println!("alongside the input with a 'bin' directory component inserted");
    println!("and a '.asm' extension.");
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))
    }
    .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
