//! Holiday calendar, start-date rules and the public lookup clients they rely on.

mod brasil_api;
mod cache;
pub mod postal;
mod rules;
mod service;

pub use brasil_api::BrasilApiClient;
pub use cache::{CachedYear, HolidayCache};
pub use rules::{is_blocked_for_start, BlockReason, StartDateCheck, StartDateRules};
pub use service::{HolidayCalendar, HolidayError, HolidaySource};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a holiday applies nationwide or only to a state/municipality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    National,
    Regional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub kind: HolidayKind,
}

impl Holiday {
    pub fn national(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: HolidayKind::National,
        }
    }
}
