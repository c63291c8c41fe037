//! Leave and vacation requests: intake, approver decisions and the listing window
//! that keeps a just-cancelled request visible for a short while.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{LeaveRequest, LeaveRequestId, LeaveStatus, LeaveSubmission, LeaveType};
pub use repository::{LeaveRepository, RepositoryError};
pub use router::leave_router;
pub use service::{LeaveError, LeaveService};
