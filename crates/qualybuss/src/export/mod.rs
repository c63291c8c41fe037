//! File exports: spreadsheet-friendly CSV and ZIP bundles of stored documents.

mod bundle;
mod csv_writer;

pub use bundle::{bundle_documents, BundleItem, BundleOutcome};
pub use csv_writer::{collaborators_csv, to_csv_bytes, CollaboratorCsvRow};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not build archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
