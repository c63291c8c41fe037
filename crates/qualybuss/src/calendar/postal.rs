//! Postal-code (CEP) lookups used to fill collaborator addresses.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PostalCodeError {
    #[error("CEP must have exactly 8 digits, got '{0}'")]
    Invalid(String),
    #[error("CEP {0} not found")]
    NotFound(String),
    #[error("postal code lookup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("postal code service answered {0}")]
    Status(u16),
}

/// Address fields returned for a CEP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub cep: String,
    pub street: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

impl ViaCepPayload {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }

    fn into_address(self, cep: String) -> Result<Address, PostalCodeError> {
        if self.is_error() {
            return Err(PostalCodeError::NotFound(cep));
        }
        Ok(Address {
            cep,
            street: self.logradouro,
            complement: self.complemento,
            district: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}

/// Strips punctuation and checks the 8-digit shape ("01310-100" -> "01310100").
pub fn normalize_cep(raw: &str) -> Result<String, PostalCodeError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 {
        Ok(digits)
    } else {
        Err(PostalCodeError::Invalid(raw.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct PostalCodeClient {
    http: Client,
    base_url: String,
}

impl PostalCodeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PostalCodeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn lookup(&self, raw_cep: &str) -> Result<Address, PostalCodeError> {
        let cep = normalize_cep(raw_cep)?;
        let url = format!("{}/ws/{cep}/json/", self.base_url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%cep, status = status.as_u16(), "postal code lookup rejected");
            return Err(PostalCodeError::Status(status.as_u16()));
        }

        let payload: ViaCepPayload = response.json().await?;
        payload.into_address(cep)
    }
}
