use std::fmt;

#[derive(Debug)]
pub enum TriageError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty needle, colliding sheet names, etc.).
    ConfigValidation(String),
    /// A consumed column name appears more than once in the input header,
    /// making name-based lookup ambiguous.
    DuplicateColumn(String),
}

impl fmt::Display for TriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateColumn(column) => {
                write!(f, "input header repeats consumed column '{column}'")
            }
        }
    }
}

impl std::error::Error for TriageError {}
