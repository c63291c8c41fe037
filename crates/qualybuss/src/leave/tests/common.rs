use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::calendar::{
    Holiday, HolidayCache, HolidayCalendar, HolidayError, HolidaySource, StartDateRules,
};
use crate::collaborator::CollaboratorId;
use crate::config::LeaveConfig;
use crate::leave::domain::{LeaveRequest, LeaveRequestId, LeaveSubmission, LeaveType};
use crate::leave::repository::{LeaveRepository, RepositoryError};
use crate::leave::service::LeaveService;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0)
        .single()
        .expect("valid instant")
}

#[derive(Clone, Default)]
pub(super) struct FixedHolidays;

impl HolidaySource for FixedHolidays {
    async fn fetch_year(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        Ok(vec![
            Holiday::national(date(year, 12, 25), "Natal"),
            Holiday::national(date(year, 11, 20), "Dia da Consciência Negra"),
        ])
    }
}

pub(super) struct OfflineHolidays;

impl HolidaySource for OfflineHolidays {
    async fn fetch_year(&self, _year: i32) -> Result<Vec<Holiday>, HolidayError> {
        Err(HolidayError::Unavailable("network down".to_string()))
    }
}

pub(super) fn calendar<S: HolidaySource>(source: S) -> Arc<HolidayCalendar<S>> {
    Arc::new(HolidayCalendar::new(
        source,
        HolidayCache::in_memory(Duration::hours(24)),
        StartDateRules::default(),
    ))
}

pub(super) fn leave_config() -> LeaveConfig {
    LeaveConfig {
        cancelled_visibility: Duration::minutes(10),
    }
}

pub(super) fn build_service() -> (
    LeaveService<MemoryRepository, FixedHolidays>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = LeaveService::new(repository.clone(), calendar(FixedHolidays), &leave_config());
    (service, repository)
}

/// Wednesday 2025-11-05 to Friday 2025-11-14: a start date no rule blocks.
pub(super) fn vacation() -> LeaveSubmission {
    LeaveSubmission {
        collaborator_id: CollaboratorId(7),
        start_date: date(2025, 11, 5),
        end_date: date(2025, 11, 14),
        leave_type: LeaveType::Vacation,
        reason: Some("Férias anuais".to_string()),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<LeaveRequestId, LeaveRequest>>>,
}

impl LeaveRepository for MemoryRepository {
    fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: LeaveRequest) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(request.id.clone(), request);
        Ok(())
    }

    fn fetch(&self, id: &LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl LeaveRepository for UnavailableRepository {
    fn insert(&self, _request: LeaveRequest) -> Result<LeaveRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _request: LeaveRequest) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
