use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use qualybuss::calendar::postal::PostalCodeClient;
use qualybuss::calendar::{
    BrasilApiClient, HolidayCache, HolidayCalendar, HolidayError, StartDateRules,
};
use qualybuss::config::CalendarConfig;
use qualybuss::documents::DocumentCategory;
use qualybuss::leave::{LeaveRepository, LeaveRequest, LeaveRequestId, RepositoryError};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) postal: Arc<PostalCodeClient>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeaveRepository {
    records: Arc<Mutex<HashMap<LeaveRequestId, LeaveRequest>>>,
}

impl InMemoryLeaveRepository {
    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<LeaveRequestId, LeaveRequest>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("leave store lock poisoned".to_string()))
    }
}

impl LeaveRepository for InMemoryLeaveRepository {
    fn insert(&self, request: LeaveRequest) -> Result<LeaveRequest, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: LeaveRequest) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&request.id) {
            guard.insert(request.id.clone(), request);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

/// Holiday calendar backed by BrasilAPI, persisting the per-year cache when a
/// directory is configured.
pub(crate) fn holiday_calendar(
    config: &CalendarConfig,
) -> Result<HolidayCalendar<BrasilApiClient>, HolidayError> {
    let source = BrasilApiClient::new(config.holiday_api_url.clone())?;
    let cache = match &config.holiday_cache_dir {
        Some(dir) => HolidayCache::persistent(config.holiday_cache_ttl, dir.clone()),
        None => HolidayCache::in_memory(config.holiday_cache_ttl),
    };
    Ok(HolidayCalendar::new(
        source,
        cache,
        StartDateRules::new(config.rest_day),
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{raw}': {err}"))
}

pub(crate) fn parse_category(raw: &str) -> Result<DocumentCategory, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "payslip" | "holerite" => Ok(DocumentCategory::Payslip),
        "attendance_sheet" | "attendance" | "folha_ponto" => Ok(DocumentCategory::AttendanceSheet),
        "bank_receipt" | "receipt" | "comprovante_bancario" => Ok(DocumentCategory::BankReceipt),
        "other" | "documento" => Ok(DocumentCategory::Other),
        other => Err(format!("unknown document category '{other}'")),
    }
}
