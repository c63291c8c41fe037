use super::service::{HolidayError, HolidaySource};
use super::{Holiday, HolidayKind};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("qualybuss/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Client for the BrasilAPI national holiday endpoint (`/feriados/v1/{year}`).
#[derive(Debug, Clone)]
pub struct BrasilApiClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FeriadoPayload {
    date: NaiveDate,
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl From<FeriadoPayload> for Holiday {
    fn from(payload: FeriadoPayload) -> Self {
        let kind = if payload.kind.eq_ignore_ascii_case("national") {
            HolidayKind::National
        } else {
            HolidayKind::Regional
        };
        Holiday {
            date: payload.date,
            name: payload.name,
            kind,
        }
    }
}

impl BrasilApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HolidayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, year: i32) -> String {
        format!("{}/feriados/v1/{year}", self.base_url)
    }
}

impl HolidaySource for BrasilApiClient {
    async fn fetch_year(&self, year: i32) -> Result<Vec<Holiday>, HolidayError> {
        let response = self.http.get(self.url_for(year)).send().await?;
        match response.status() {
            status if status.is_success() => {
                let payload: Vec<FeriadoPayload> = response.json().await?;
                Ok(payload.into_iter().map(Holiday::from).collect())
            }
            StatusCode::NOT_FOUND => Err(HolidayError::UnsupportedYear(year)),
            status => Err(HolidayError::Status {
                year,
                status: status.as_u16(),
            }),
        }
    }
}
