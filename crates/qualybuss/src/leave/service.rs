use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::domain::{LeaveRequest, LeaveRequestId, LeaveStatus, LeaveSubmission};
use super::repository::{LeaveRepository, RepositoryError};
use crate::calendar::{BlockReason, HolidayCalendar, HolidayError, HolidaySource};
use crate::config::LeaveConfig;

/// Leave intake and approver decisions on top of the repository and holiday calendar.
pub struct LeaveService<R, S> {
    repository: Arc<R>,
    calendar: Arc<HolidayCalendar<S>>,
    cancelled_visibility: Duration,
}

static LEAVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_leave_id() -> LeaveRequestId {
    let id = LEAVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeaveRequestId(format!("leave-{id:06}"))
}

impl<R, S> LeaveService<R, S>
where
    R: LeaveRepository + 'static,
    S: HolidaySource + 'static,
{
    pub fn new(
        repository: Arc<R>,
        calendar: Arc<HolidayCalendar<S>>,
        config: &LeaveConfig,
    ) -> Self {
        Self {
            repository,
            calendar,
            cancelled_visibility: config.cancelled_visibility,
        }
    }

    pub fn calendar(&self) -> &HolidayCalendar<S> {
        &self.calendar
    }

    /// Validate and store a new request in `pending`.
    pub async fn submit(
        &self,
        submission: LeaveSubmission,
        now: DateTime<Utc>,
    ) -> Result<LeaveRequest, LeaveError> {
        if submission.start_date > submission.end_date {
            return Err(LeaveError::InvalidPeriod {
                start: submission.start_date,
                end: submission.end_date,
            });
        }

        if submission.leave_type.checks_start_date() {
            let check = self.calendar.check_start(submission.start_date).await?;
            if check.blocked {
                tracing::info!(
                    collaborator = %submission.collaborator_id,
                    start = %submission.start_date,
                    reasons = %check.summary(),
                    "vacation start refused"
                );
                return Err(LeaveError::BlockedStart {
                    date: submission.start_date,
                    reasons: check.reasons,
                });
            }
        }

        let request = LeaveRequest::from_submission(next_leave_id(), submission, now);
        let stored = self.repository.insert(request)?;
        tracing::info!(
            leave_id = %stored.id,
            collaborator = %stored.collaborator_id,
            "leave request submitted"
        );
        Ok(stored)
    }

    pub fn approve(
        &self,
        id: &LeaveRequestId,
        at: DateTime<Utc>,
    ) -> Result<LeaveRequest, LeaveError> {
        self.transition(id, LeaveStatus::Approved, at)
    }

    pub fn reject(
        &self,
        id: &LeaveRequestId,
        at: DateTime<Utc>,
    ) -> Result<LeaveRequest, LeaveError> {
        self.transition(id, LeaveStatus::Rejected, at)
    }

    /// Balance reversal for approved requests happens in the backend once the status flips.
    pub fn cancel(
        &self,
        id: &LeaveRequestId,
        at: DateTime<Utc>,
    ) -> Result<LeaveRequest, LeaveError> {
        self.transition(id, LeaveStatus::Cancelled, at)
    }

    pub fn get(&self, id: &LeaveRequestId) -> Result<LeaveRequest, LeaveError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| LeaveError::NotFound(id.clone()))
    }

    /// Every live request plus cancellations younger than the visibility window.
    pub fn visible(&self, now: DateTime<Utc>) -> Result<Vec<LeaveRequest>, LeaveError> {
        let mut requests: Vec<LeaveRequest> = self
            .repository
            .list()?
            .into_iter()
            .filter(|request| match (request.status, request.cancelled_at) {
                (LeaveStatus::Cancelled, Some(cancelled_at)) => {
                    now - cancelled_at <= self.cancelled_visibility
                }
                (LeaveStatus::Cancelled, None) => false,
                _ => true,
            })
            .collect();
        requests.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.0.cmp(&b.id.0)));
        Ok(requests)
    }

    fn transition(
        &self,
        id: &LeaveRequestId,
        next: LeaveStatus,
        at: DateTime<Utc>,
    ) -> Result<LeaveRequest, LeaveError> {
        let mut request = self.get(id)?;

        if !request.status.can_become(next) {
            return Err(LeaveError::IllegalTransition {
                from: request.status,
                to: next,
            });
        }

        request.status = next;
        match next {
            LeaveStatus::Cancelled => request.cancelled_at = Some(at),
            _ => request.decided_at = Some(at),
        }

        self.repository.update(request.clone())?;
        tracing::info!(leave_id = %id, status = next.label(), "leave request updated");
        Ok(request)
    }
}

/// Error raised by the leave service.
#[derive(Debug, thiserror::Error)]
pub enum LeaveError {
    #[error("start date {start} is after end date {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("vacation cannot start on {date}: {}", join_reasons(.reasons))]
    BlockedStart {
        date: NaiveDate,
        reasons: Vec<BlockReason>,
    },
    #[error("leave request cannot move from {} to {}", .from.label(), .to.label())]
    IllegalTransition { from: LeaveStatus, to: LeaveStatus },
    #[error("leave request {0} not found")]
    NotFound(LeaveRequestId),
    #[error(transparent)]
    Calendar(#[from] HolidayError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn join_reasons(reasons: &[BlockReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
