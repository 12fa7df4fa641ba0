use thiserror::Error;

/// Errors from picking a weighted option.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChoiceError {
    /// The call itself was malformed; fix the call site.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Nothing was selected despite valid input. Points at a defect in the
    /// walk or in the random draw, never at the caller's options.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ChoiceError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ChoiceError::InvalidArgument(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ChoiceError::Internal(_))
    }
}
