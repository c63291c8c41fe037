use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an employee record in the backing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollaboratorId(pub u64);

impl fmt::Display for CollaboratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The slice of a collaborator record the document matcher reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: CollaboratorId,
    pub full_name: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub cbo: Option<String>,
    #[serde(default)]
    pub bank_agency: Option<String>,
    #[serde(default)]
    pub bank_account: Option<String>,
}

impl RosterEntry {
    pub fn new(id: u64, full_name: impl Into<String>) -> Self {
        Self {
            id: CollaboratorId(id),
            full_name: full_name.into(),
            cpf: None,
            cbo: None,
            bank_agency: None,
            bank_account: None,
        }
    }
}

/// Flat projection of a collaborator used by the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorRecord {
    pub id: CollaboratorId,
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub admission_date: NaiveDate,
    pub active: bool,
}
