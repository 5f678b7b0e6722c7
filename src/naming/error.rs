use crate::types::resolution::Resolution;
use crate::types::variable::Variable;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("No short code for variable '{variable}' at {resolution} resolution")]
    UnknownVariable {
        variable: Variable,
        resolution: Resolution,
    },

    #[error("Unknown variable name '{0}'")]
    UnknownVariableName(String),

    #[error("Unknown resolution '{0}', expected one of 10_minutes, hourly, daily")]
    UnknownResolution(String),

    #[error("Unknown era '{0}', expected one of historical, recent, now")]
    UnknownEra(String),
}
