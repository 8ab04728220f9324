use thiserror::Error;

use gamebase_lib::ConvertError;

/// Errors that end the CLI with a non-zero exit status.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Settings file could not be read or was invalid
    #[error("Could not load settings: {0}")]
    Settings(#[source] ConvertError),

    /// The conversion run failed
    #[error("{0}")]
    Convert(#[from] ConvertError),
}

impl CliError {
    pub(crate) fn settings(source: ConvertError) -> Self {
        Self::Settings(source)
    }
}
