use thiserror::Error;
use whopays_domain::{ExpenseBuildError, GroupBuildError, model::GroupId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store data could not be (de)serialized: {0}")]
    Serialization(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum GroupServiceError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),
    #[error(transparent)]
    InvalidGroup(#[from] GroupBuildError),
    #[error(transparent)]
    InvalidExpense(#[from] ExpenseBuildError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
