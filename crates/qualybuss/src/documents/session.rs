use serde::Serialize;

use super::anomaly::detect_category_anomaly;
use super::matcher::find_collaborator_match;
use super::{DocumentCategory, MatchType, PageStatus, ScannedPage};
use crate::batch::BatchReport;
use crate::collaborator::{CollaboratorId, RosterEntry};

const SNIPPET_CHARS: usize = 160;
const DEFAULT_REFERENCE: &str = "importacao";

/// Failure reported by the PDF engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ExtractionError(pub String);

/// PDF handling delegated to an external engine.
pub trait PdfEngine {
    /// Text of every page, in page order.
    fn page_texts(&self, document: &[u8]) -> Result<Vec<String>, ExtractionError>;
    /// Rewrites the document's structure (xref table, object streams) so it can be read again.
    fn repair(&self, document: &[u8]) -> Result<Vec<u8>, ExtractionError>;
    /// New document containing only the given zero-based pages.
    fn extract_pages(&self, document: &[u8], pages: &[usize]) -> Result<Vec<u8>, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage rejected {path}: {reason}")]
    Rejected { path: String, reason: String },
}

/// Object storage bucket for collaborator documents.
pub trait DocumentStore {
    /// Stores the file and returns its storage key.
    fn upload(
        &self,
        collaborator: CollaboratorId,
        file_name: &str,
        content_type: &mime::Mime,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("the PDF could not be read, even after an automatic repair: {0}")]
    Unreadable(ExtractionError),
    #[error("the PDF has no pages")]
    Empty,
    #[error("page {0} does not exist in this import")]
    PageOutOfRange(usize),
    #[error("collaborator {0} is not in the roster")]
    UnknownCollaborator(CollaboratorId),
}

/// Pages that go to the same collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitGroup {
    pub collaborator: CollaboratorId,
    pub full_name: String,
    pub pages: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedDocument {
    pub collaborator: CollaboratorId,
    pub storage_key: String,
    pub pages: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub perfect: usize,
    pub divergence: usize,
    pub name_only: usize,
    pub cbo_only: usize,
    pub unmatched: usize,
    pub warnings: usize,
}

/// State of one bulk import, from extraction until upload.
#[derive(Debug)]
pub struct ImportSession {
    category: DocumentCategory,
    roster: Vec<RosterEntry>,
    document: Vec<u8>,
    pages: Vec<ScannedPage>,
}

impl ImportSession {
    /// Extract and match every page. A failed extraction gets exactly one repair attempt.
    pub fn open<E: PdfEngine>(
        engine: &E,
        document: Vec<u8>,
        category: DocumentCategory,
        roster: Vec<RosterEntry>,
    ) -> Result<Self, ImportError> {
        let (document, texts) = match engine.page_texts(&document) {
            Ok(texts) => (document, texts),
            Err(first) => {
                tracing::warn!(error = %first, "text extraction failed, repairing document");
                let repaired = engine.repair(&document).map_err(ImportError::Unreadable)?;
                let texts = engine
                    .page_texts(&repaired)
                    .map_err(ImportError::Unreadable)?;
                (repaired, texts)
            }
        };

        if texts.is_empty() {
            return Err(ImportError::Empty);
        }

        let pages = texts
            .iter()
            .enumerate()
            .map(|(page_index, text)| scan_page(page_index, text, category, &roster))
            .collect::<Vec<_>>();

        tracing::info!(
            pages = pages.len(),
            category = category.slug(),
            "document import opened"
        );

        Ok(Self {
            category,
            roster,
            document,
            pages,
        })
    }

    pub fn category(&self) -> DocumentCategory {
        self.category
    }

    pub fn pages(&self) -> &[ScannedPage] {
        &self.pages
    }

    /// Operator picks the collaborator by hand; anomaly rules are not re-run.
    pub fn override_match(
        &mut self,
        page_index: usize,
        collaborator: CollaboratorId,
    ) -> Result<&ScannedPage, ImportError> {
        let entry = self
            .roster
            .iter()
            .find(|entry| entry.id == collaborator)
            .ok_or(ImportError::UnknownCollaborator(collaborator))?;
        let page = self
            .pages
            .get_mut(page_index)
            .ok_or(ImportError::PageOutOfRange(page_index))?;

        page.matched = Some(entry.id);
        page.matched_name = Some(entry.full_name.clone());
        page.status = PageStatus::Matched;
        page.detail = "manual selection".to_string();
        Ok(page)
    }

    pub fn summary(&self) -> ImportSummary {
        let mut summary = ImportSummary {
            total: self.pages.len(),
            ..ImportSummary::default()
        };
        for page in &self.pages {
            match page.match_type {
                MatchType::Perfect => summary.perfect += 1,
                MatchType::Divergence => summary.divergence += 1,
                MatchType::NameOnly => summary.name_only += 1,
                MatchType::CboOnly => summary.cbo_only += 1,
                MatchType::None => summary.unmatched += 1,
            }
            if page.status == PageStatus::Warning {
                summary.warnings += 1;
            }
        }
        summary
    }

    /// Pages grouped per matched collaborator, ordered by first page. Only pages in
    /// `matched` status are included; pages awaiting review join once overridden.
    pub fn split_plan(&self) -> Vec<SplitGroup> {
        let mut groups: Vec<SplitGroup> = Vec::new();
        for page in &self.pages {
            if page.status != PageStatus::Matched {
                continue;
            }
            let (Some(collaborator), Some(full_name)) = (page.matched, page.matched_name.as_ref())
            else {
                continue;
            };
            match groups
                .iter_mut()
                .find(|group| group.collaborator == collaborator)
            {
                Some(group) => group.pages.push(page.page_index),
                None => groups.push(SplitGroup {
                    collaborator,
                    full_name: full_name.clone(),
                    pages: vec![page.page_index],
                }),
            }
        }
        groups
    }

    /// Split and upload one file per collaborator, one at a time. Failures are collected.
    pub fn upload_all<E: PdfEngine, S: DocumentStore>(
        &self,
        engine: &E,
        store: &S,
        reference: &str,
    ) -> BatchReport<UploadedDocument> {
        let mut report = BatchReport::default();
        let reference = reference_slug(reference);

        for group in self.split_plan() {
            let file_name = format!(
                "{}_{}_{}.pdf",
                self.category.slug(),
                reference,
                group.collaborator
            );
            let result = engine
                .extract_pages(&self.document, &group.pages)
                .map_err(|err| err.to_string())
                .and_then(|bytes| {
                    store
                        .upload(group.collaborator, &file_name, &mime::APPLICATION_PDF, bytes)
                        .map_err(|err| err.to_string())
                })
                .map(|storage_key| UploadedDocument {
                    collaborator: group.collaborator,
                    storage_key,
                    pages: group.pages.clone(),
                });
            report.record(file_name, result);
        }

        tracing::info!(
            uploaded = report.succeeded.len(),
            failed = report.failures.len(),
            "document import uploaded"
        );
        report
    }
}

/// Letters, digits, `-` and `_` survive; any other run becomes a single `-`.
fn reference_slug(reference: &str) -> String {
    let mut slug = String::with_capacity(reference.len());
    for ch in reference.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            slug.push(ch);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        DEFAULT_REFERENCE.to_string()
    } else {
        slug.to_string()
    }
}

fn scan_page(
    page_index: usize,
    text: &str,
    category: DocumentCategory,
    roster: &[RosterEntry],
) -> ScannedPage {
    let outcome = find_collaborator_match(text, category, roster);
    let anomaly = detect_category_anomaly(text, category);
    let status = PageStatus::for_match(outcome.match_type, anomaly.as_ref());

    ScannedPage {
        page_index,
        snippet: text.trim().chars().take(SNIPPET_CHARS).collect(),
        matched: outcome.matched.as_ref().map(|entry| entry.id),
        matched_name: outcome.matched.map(|entry| entry.full_name),
        match_type: outcome.match_type,
        status,
        detail: outcome.detail,
        anomaly,
    }
}
