use thiserror::Error;

/// Failure reported by a search or data source.
///
/// Widgets never surface these to the user; they log the failure, release their loading gate
/// and keep the previous content.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("fetch rejected: {0}")]
    Rejected(String),

    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Invalid widget options.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    #[error("page numbers start at 1")]
    ZeroPage,

    #[error("key field must not be empty when set")]
    EmptyKeyField,
}
