use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ExportError;
use crate::batch::BatchReport;

/// A stored document to place in the archive under `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleItem {
    pub path: String,
    pub storage_key: String,
}

#[derive(Debug)]
pub struct BundleOutcome {
    pub archive: Vec<u8>,
    /// Archive paths that made it in, plus the items whose download failed.
    pub report: BatchReport<String>,
}

/// Download each item in turn and zip the ones that arrive. A failed download is
/// recorded and skipped; only archive-level errors abort the bundle.
pub fn bundle_documents<F, E>(
    items: &[BundleItem],
    mut fetch: F,
) -> Result<BundleOutcome, ExportError>
where
    F: FnMut(&BundleItem) -> Result<Vec<u8>, E>,
    E: Display,
{
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used_paths = HashSet::new();
    let mut report = BatchReport::default();

    for item in items {
        let bytes = match fetch(item) {
            Ok(bytes) => bytes,
            Err(err) => {
                report.record(item.storage_key.clone(), Err::<String, _>(err));
                continue;
            }
        };

        let path = unique_path(&item.path, &mut used_paths);
        zip.start_file(path.as_str(), options)?;
        zip.write_all(&bytes)?;
        report.record(item.storage_key.clone(), Ok::<_, String>(path));
    }

    let archive = zip.finish()?.into_inner();
    tracing::info!(
        files = report.succeeded.len(),
        failed = report.failures.len(),
        "document bundle built"
    );
    Ok(BundleOutcome { archive, report })
}

/// "a.pdf", "a.pdf" -> "a.pdf", "a (2).pdf".
fn unique_path(path: &str, used: &mut HashSet<String>) -> String {
    if used.insert(path.to_string()) {
        return path.to_string();
    }

    let (stem, extension) = match path.rfind('.') {
        Some(dot) if dot > 0 => path.split_at(dot),
        _ => (path, ""),
    };
    let mut counter = 2;
    loop {
        let candidate = format!("{stem} ({counter}){extension}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn item(path: &str, key: &str) -> BundleItem {
        BundleItem {
            path: path.to_string(),
            storage_key: key.to_string(),
        }
    }

    #[test]
    fn failed_downloads_are_reported_and_skipped() {
        let items = vec![
            item("ana/holerite.pdf", "docs/1/a"),
            item("bruno/holerite.pdf", "docs/2/missing"),
            item("carla/holerite.pdf", "docs/3/c"),
        ];

        let outcome = bundle_documents(&items, |item| {
            if item.storage_key.ends_with("missing") {
                Err("object not found")
            } else {
                Ok(item.storage_key.as_bytes().to_vec())
            }
        })
        .expect("bundle builds");

        assert_eq!(
            outcome.report.succeeded,
            vec!["ana/holerite.pdf".to_string(), "carla/holerite.pdf".to_string()]
        );
        assert_eq!(outcome.report.failures.len(), 1);
        assert_eq!(outcome.report.failures[0].item, "docs/2/missing");

        let mut archive = ZipArchive::new(Cursor::new(outcome.archive)).expect("valid zip");
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("carla/holerite.pdf")
            .expect("entry present")
            .read_to_string(&mut content)
            .expect("read entry");
        assert_eq!(content, "docs/3/c");
    }

    #[test]
    fn duplicate_paths_get_a_counter() {
        let mut used = HashSet::new();
        assert_eq!(unique_path("ponto.pdf", &mut used), "ponto.pdf");
        assert_eq!(unique_path("ponto.pdf", &mut used), "ponto (2).pdf");
        assert_eq!(unique_path("ponto.pdf", &mut used), "ponto (3).pdf");
        assert_eq!(unique_path("LEIAME", &mut used), "LEIAME");
        assert_eq!(unique_path("LEIAME", &mut used), "LEIAME (2)");
    }
}
