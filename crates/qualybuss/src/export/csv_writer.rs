use serde::Serialize;
use std::io::Write;

use super::ExportError;
use crate::collaborator::CollaboratorRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serialize rows as comma-separated UTF-8 with a BOM so spreadsheet tools pick the encoding.
/// Fields holding commas, quotes or line breaks are quoted with inner quotes doubled.
pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::with_capacity(UTF8_BOM.len() + rows.len() * 64);
    buffer.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(buffer);
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

/// Column layout of the collaborator spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaboratorCsvRow {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Nome")]
    pub full_name: String,
    #[serde(rename = "CPF")]
    pub cpf: String,
    #[serde(rename = "E-mail")]
    pub email: String,
    #[serde(rename = "Departamento")]
    pub department: String,
    #[serde(rename = "Cargo")]
    pub role: String,
    #[serde(rename = "Admissão")]
    pub admission_date: String,
    #[serde(rename = "Ativo")]
    pub active: &'static str,
}

impl From<&CollaboratorRecord> for CollaboratorCsvRow {
    fn from(record: &CollaboratorRecord) -> Self {
        Self {
            id: record.id.0,
            full_name: record.full_name.clone(),
            cpf: record.cpf.clone(),
            email: record.email.clone(),
            department: record.department.clone(),
            role: record.role.clone(),
            admission_date: record.admission_date.format("%d/%m/%Y").to_string(),
            active: if record.active { "Sim" } else { "Não" },
        }
    }
}

pub fn collaborators_csv(records: &[CollaboratorRecord]) -> Result<Vec<u8>, ExportError> {
    let rows: Vec<CollaboratorCsvRow> = records.iter().map(CollaboratorCsvRow::from).collect();
    to_csv_bytes(&rows)
}
