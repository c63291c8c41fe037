use super::domain::{LeaveRequest, LeaveRequestId};

/// Storage abstraction over the leave table of the hosted backend.
pub trait LeaveRepository: Send + Sync {
    fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, RepositoryError>;
    fn update(&self, request: LeaveRequest) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError>;
    fn list(&self) -> Result<Vec<LeaveRequest>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
