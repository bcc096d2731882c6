//! Error types for dropkit

use thiserror::Error;

/// Errors that can occur while configuring or rendering a dropdown
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropdownError {
    /// A trigger, panel or option was rendered outside its owning root
    #[error("`{part}` must be rendered inside its dropdown root")]
    PartOutsideRoot { part: &'static str },

    /// Configuration could not be parsed
    #[error("Invalid dropdown configuration: {0}")]
    Config(String),

    /// Programmatic selection of a value with no registered option
    #[error("No option registered for value `{0}`")]
    UnknownOption(String),
}

impl From<toml::de::Error> for DropdownError {
    fn from(err: toml::de::Error) -> Self {
        DropdownError::Config(err.to_string())
    }
}

/// Result type for dropkit operations
pub type Result<T> = std::result::Result<T, DropdownError>;
