use thiserror::Error;

/// Everything the driver itself (as opposed to the parser) can fail on:
/// reading the source file and writing the assembly output.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read '{path}': {source}")]
    ReadSource {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write '{path}': {source}")]
    WriteOutput {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
