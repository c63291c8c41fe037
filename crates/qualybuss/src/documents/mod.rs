//! Bulk document import: page-to-collaborator matching, category sanity checks and
//! the per-import session that splits and uploads the result.

mod anomaly;
mod matcher;
pub mod router;
mod session;

pub use anomaly::{detect_category_anomaly, CategoryAnomaly};
pub use matcher::{find_collaborator_match, MatchOutcome};
pub use router::documents_router;
pub use session::{
    DocumentStore, ExtractionError, ImportError, ImportSession, ImportSummary, PdfEngine,
    SplitGroup, StoreError, UploadedDocument,
};

use serde::{Deserialize, Serialize};

use crate::collaborator::CollaboratorId;

/// Kind of document the operator declared for the uploaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    #[default]
    Payslip,
    AttendanceSheet,
    BankReceipt,
    Other,
}

impl DocumentCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentCategory::Payslip => "holerite",
            DocumentCategory::AttendanceSheet => "folha_ponto",
            DocumentCategory::BankReceipt => "comprovante_bancario",
            DocumentCategory::Other => "documento",
        }
    }
}

/// Confidence tier of a page match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Perfect,
    Divergence,
    NameOnly,
    CboOnly,
    None,
}

/// Display status of a scanned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Matched,
    NeedsReview,
    Unmatched,
    Warning,
}

impl PageStatus {
    pub(crate) fn for_match(match_type: MatchType, anomaly: Option<&CategoryAnomaly>) -> Self {
        if anomaly.is_some() {
            return PageStatus::Warning;
        }
        match match_type {
            MatchType::Perfect | MatchType::NameOnly => PageStatus::Matched,
            MatchType::Divergence | MatchType::CboOnly => PageStatus::NeedsReview,
            MatchType::None => PageStatus::Unmatched,
        }
    }
}

/// One page of an import session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedPage {
    pub page_index: usize,
    pub snippet: String,
    pub matched: Option<CollaboratorId>,
    pub matched_name: Option<String>,
    pub match_type: MatchType,
    pub status: PageStatus,
    pub detail: String,
    pub anomaly: Option<CategoryAnomaly>,
}
