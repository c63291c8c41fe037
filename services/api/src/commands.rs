use crate::infra::{holiday_calendar, parse_category, parse_date};
use chrono::NaiveDate;
use clap::Args;
use qualybuss::calendar::{Holiday, StartDateCheck, StartDateRules};
use qualybuss::collaborator::{CollaboratorRecord, RosterEntry};
use qualybuss::config::AppConfig;
use qualybuss::documents::{detect_category_anomaly, find_collaborator_match, DocumentCategory};
use qualybuss::error::AppError;
use qualybuss::export::{bundle_documents, collaborators_csv, BundleItem};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct CheckStartArgs {
    /// Proposed first day of leave (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: NaiveDate,
    /// JSON file with the holiday list; skips the public holiday API when given
    #[arg(long)]
    pub(crate) holidays: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Plain-text file holding the extracted page text
    #[arg(long)]
    pub(crate) text: PathBuf,
    /// JSON roster of collaborators to match against
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Declared document category (payslip, attendance_sheet, bank_receipt, other)
    #[arg(long, value_parser = parse_category, default_value = "payslip")]
    pub(crate) category: DocumentCategory,
}

#[derive(Args, Debug)]
pub(crate) struct BundleArgs {
    /// Destination ZIP file
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Files to place in the archive
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON file with the collaborator records
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination CSV file
    #[arg(long)]
    pub(crate) output: PathBuf,
}

pub(crate) async fn run_check_start(args: CheckStartArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let check = match args.holidays {
        Some(path) => {
            let holidays: Vec<Holiday> = read_json(&path)?;
            StartDateRules::new(config.calendar.rest_day).evaluate(args.date, &holidays)
        }
        None => {
            let calendar = holiday_calendar(&config.calendar)?;
            calendar.check_start(args.date).await?
        }
    };

    render_start_check(args.date, &check);
    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let text = std::fs::read_to_string(&args.text)?;
    let roster: Vec<RosterEntry> = read_json(&args.roster)?;

    let outcome = find_collaborator_match(&text, args.category, &roster);
    println!("Match tier: {:?}", outcome.match_type);
    match &outcome.matched {
        Some(entry) => println!("Collaborator: {} (#{})", entry.full_name, entry.id),
        None => println!("Collaborator: none"),
    }
    println!("Detail: {}", outcome.detail);

    if let Some(anomaly) = detect_category_anomaly(&text, args.category) {
        println!(
            "Warning: found '{}', this looks like a {:?} rather than a {:?}",
            anomaly.keyword, anomaly.looks_like, args.category
        );
    }
    Ok(())
}

pub(crate) fn run_bundle(args: BundleArgs) -> Result<(), AppError> {
    let items: Vec<BundleItem> = args
        .files
        .iter()
        .map(|path| BundleItem {
            path: file_label(path),
            storage_key: path.display().to_string(),
        })
        .collect();

    let outcome = bundle_documents(&items, |item| std::fs::read(&item.storage_key))?;
    std::fs::write(&args.output, &outcome.archive)?;

    println!(
        "Wrote {} ({} of {} files)",
        args.output.display(),
        outcome.report.succeeded.len(),
        outcome.report.total()
    );
    for failure in &outcome.report.failures {
        println!("- skipped {}: {}", failure.item, failure.error);
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let records: Vec<CollaboratorRecord> = read_json(&args.input)?;
    let bytes = collaborators_csv(&records)?;
    std::fs::write(&args.output, bytes)?;
    println!("Exported {} collaborators to {}", records.len(), args.output.display());
    Ok(())
}

fn render_start_check(date: NaiveDate, check: &StartDateCheck) {
    if check.blocked {
        println!("{date}: blocked for a vacation start");
        for reason in &check.reasons {
            println!("- {reason}");
        }
    } else {
        println!("{date}: allowed");
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&raw).map_err(std::io::Error::from)?;
    Ok(value)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_json_surfaces_parse_errors_as_io() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        match read_json::<Vec<RosterEntry>>(file.path()) {
            Err(AppError::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn bundle_skips_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let present = dir.path().join("holerite.pdf");
        std::fs::write(&present, b"%PDF-1.4").expect("write");
        let output = dir.path().join("bundle.zip");

        run_bundle(BundleArgs {
            output: output.clone(),
            files: vec![present, dir.path().join("missing.pdf")],
        })
        .expect("bundle written");

        let bytes = std::fs::read(&output).expect("archive exists");
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn check_start_answers_for_the_last_representable_date() {
        let mut holidays = tempfile::NamedTempFile::new().expect("temp file");
        write!(holidays, "[]").expect("write");

        run_check_start(CheckStartArgs {
            date: parse_date("+262142-12-31").expect("max date parses"),
            holidays: Some(holidays.path().to_path_buf()),
        })
        .await
        .expect("check runs");
    }

    #[test]
    fn file_label_uses_file_name() {
        assert_eq!(file_label(Path::new("/tmp/docs/ponto.pdf")), "ponto.pdf");
    }
}
