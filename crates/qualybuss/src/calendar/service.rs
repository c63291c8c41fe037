use super::cache::{CachedYear, HolidayCache};
use super::rules::{StartDateCheck, StartDateRules};
use super::Holiday;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Failures while loading holidays from the public calendar API.
#[derive(Debug, thiserror::Error)]
pub enum HolidayError {
    #[error("holiday lookup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("holiday API answered {status} for year {year}")]
    Status { year: i32, status: u16 },
    #[error("year {0} is outside the range served by the holiday API")]
    UnsupportedYear(i32),
    #[error("holiday source unavailable: {0}")]
    Unavailable(String),
}

/// Anything able to list one calendar year's holidays.
pub trait HolidaySource: Send + Sync {
    fn fetch_year(
        &self,
        year: i32,
    ) -> impl Future<Output = Result<Vec<Holiday>, HolidayError>> + Send;
}

/// Cache-fronted holiday lookups plus the start-date rules that consume them.
pub struct HolidayCalendar<S> {
    source: S,
    cache: Mutex<HolidayCache>,
    rules: StartDateRules,
}

impl<S: HolidaySource> HolidayCalendar<S> {
    pub fn new(source: S, cache: HolidayCache, rules: StartDateRules) -> Self {
        Self {
            source,
            cache: Mutex::new(cache),
            rules,
        }
    }

    pub fn rules(&self) -> StartDateRules {
        self.rules
    }

    pub async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        self.holidays_for_year_at(year, Utc::now()).await
    }

    pub(crate) async fn holidays_for_year_at(
        &self,
        year: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Holiday>, HolidayError> {
        let cached = self.lock_cache().get(year, now);
        if let Some(holidays) = cached {
            return Ok(holidays);
        }

        tracing::info!(year, "fetching holidays from source");
        let holidays = self.source.fetch_year(year).await.map_err(|err| {
            tracing::error!(year, error = %err, "holiday fetch failed");
            err
        })?;

        let (entry, directory) = {
            let mut cache = self.lock_cache();
            let entry = cache.remember(year, holidays.clone(), now);
            (entry, cache.directory().map(Path::to_path_buf))
        };
        if let Some(directory) = directory {
            persist_in_background(directory, entry).await;
        }
        Ok(holidays)
    }

    /// Holidays of the year of `date` and, when different, of the year two days later.
    pub async fn holidays_around(&self, date: NaiveDate) -> Result<Vec<Holiday>, HolidayError> {
        let mut holidays = self.holidays_for_year(date.year()).await?;
        let horizon = date.checked_add_days(Days::new(2)).map(|ahead| ahead.year());
        if let Some(horizon) = horizon.filter(|year| *year != date.year()) {
            holidays.extend(self.holidays_for_year(horizon).await?);
        }
        Ok(holidays)
    }

    pub async fn check_start(&self, date: NaiveDate) -> Result<StartDateCheck, HolidayError> {
        let holidays = self.holidays_around(date).await?;
        Ok(self.rules.evaluate(date, &holidays))
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HolidayCache> {
        // The cache holds no invariants that a panicking writer could break.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// File writes run on the blocking pool, away from the cache lock.
async fn persist_in_background(directory: PathBuf, entry: CachedYear) {
    let year = entry.year;
    let write = tokio::task::spawn_blocking(move || HolidayCache::persist(&directory, &entry));
    match write.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::warn!(year, error = %err, "could not persist holiday cache entry")
        }
        Err(err) => tracing::warn!(year, error = %err, "holiday cache writer stopped"),
    }
}
