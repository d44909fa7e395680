use thiserror::Error;

pub type DfResult<T> = Result<T, DfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid setting {name} = {value}: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
