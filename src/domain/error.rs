use thiserror::Error;

/// Rejected content input. Field names use the API spelling (`memberSince`, not `member_since`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("`{0}` is not a valid calendar date")]
    InvalidDate(String),
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidDate(_) => "date",
        }
    }
}
