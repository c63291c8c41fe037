use super::Holiday;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One year's worth of holidays and when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedYear {
    pub year: i32,
    pub fetched_at: DateTime<Utc>,
    pub holidays: Vec<Holiday>,
}

impl CachedYear {
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < ttl
    }
}

/// Per-year holiday cache with an optional directory of `holidays-<year>.json` files.
#[derive(Debug)]
pub struct HolidayCache {
    ttl: Duration,
    directory: Option<PathBuf>,
    entries: HashMap<i32, CachedYear>,
}

impl HolidayCache {
    pub fn in_memory(ttl: Duration) -> Self {
        Self {
            ttl,
            directory: None,
            entries: HashMap::new(),
        }
    }

    pub fn persistent(ttl: Duration, directory: impl Into<PathBuf>) -> Self {
        Self {
            ttl,
            directory: Some(directory.into()),
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the year's holidays if an entry younger than the TTL exists.
    pub fn get(&mut self, year: i32, now: DateTime<Utc>) -> Option<Vec<Holiday>> {
        if !self.entries.contains_key(&year) {
            if let Some(entry) = self.load_from_disk(year) {
                self.entries.insert(year, entry);
            }
        }

        let entry = self.entries.get(&year)?;
        if entry.is_fresh(self.ttl, now) {
            Some(entry.holidays.clone())
        } else {
            tracing::debug!(year, fetched_at = %entry.fetched_at, "holiday cache entry expired");
            None
        }
    }

    /// Keeps the entry in memory and writes it to the cache directory, if any.
    pub fn store(&mut self, year: i32, holidays: Vec<Holiday>, now: DateTime<Utc>) {
        let entry = self.remember(year, holidays, now);
        if let Some(directory) = self.directory.as_deref() {
            if let Err(err) = Self::persist(directory, &entry) {
                tracing::warn!(year, error = %err, "could not persist holiday cache entry");
            }
        }
    }

    /// In-memory half of [`HolidayCache::store`]; the caller persists the returned entry.
    pub fn remember(
        &mut self,
        year: i32,
        holidays: Vec<Holiday>,
        now: DateTime<Utc>,
    ) -> CachedYear {
        let entry = CachedYear {
            year,
            fetched_at: now,
            holidays,
        };
        self.entries.insert(year, entry.clone());
        entry
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Blocking write of one year's file.
    pub fn persist(directory: &Path, entry: &CachedYear) -> io::Result<()> {
        fs::create_dir_all(directory)?;
        let payload = serde_json::to_vec(entry).map_err(io::Error::other)?;
        fs::write(Self::file_for(directory, entry.year), payload)
    }

    fn file_for(directory: &Path, year: i32) -> PathBuf {
        directory.join(format!("holidays-{year}.json"))
    }

    fn load_from_disk(&self, year: i32) -> Option<CachedYear> {
        let directory = self.directory.as_deref()?;
        let raw = fs::read(Self::file_for(directory, year)).ok()?;
        match serde_json::from_slice::<CachedYear>(&raw) {
            Ok(entry) if entry.year == year => Some(entry),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(year, error = %err, "ignoring unreadable holiday cache file");
                None
            }
        }
    }
}
