use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::{DocumentCategory, MatchType};
use crate::collaborator::RosterEntry;

const MIN_AGENCY_DIGITS: usize = 3;
const MIN_ACCOUNT_DIGITS: usize = 4;

/// Result of matching one page against the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub match_type: MatchType,
    pub matched: Option<RosterEntry>,
    pub detail: String,
}

impl MatchOutcome {
    fn perfect(entry: &RosterEntry, detail: String) -> Self {
        Self {
            match_type: MatchType::Perfect,
            matched: Some(entry.clone()),
            detail,
        }
    }

    fn none() -> Self {
        Self {
            match_type: MatchType::None,
            matched: None,
            detail: "no collaborator identified".to_string(),
        }
    }
}

fn cpf_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b").expect("CPF pattern compiles")
    })
}

/// Occupation code printed after a "CBO" label, e.g. "CBO: 2521-05".
fn labelled_cbo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bcbo\b[^\d\n]{0,10}(\d[\d.\-]*\d)").expect("CBO pattern compiles")
    })
}

fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn match_by_cpf<'a>(
    page_text: &str,
    roster: &'a [RosterEntry],
) -> Option<(&'a RosterEntry, String)> {
    cpf_pattern().find_iter(page_text).find_map(|found| {
        let cpf = found.as_str();
        roster
            .iter()
            .find(|entry| entry.cpf.as_deref().map(str::trim) == Some(cpf))
            .map(|entry| (entry, cpf.to_string()))
    })
}

fn match_by_bank_account<'a>(
    page_text: &str,
    roster: &'a [RosterEntry],
) -> Option<&'a RosterEntry> {
    let page_digits = digits_only(page_text);
    roster.iter().find(|entry| {
        let agency = entry.bank_agency.as_deref().map(digits_only).unwrap_or_default();
        let account = entry.bank_account.as_deref().map(digits_only).unwrap_or_default();
        agency.len() >= MIN_AGENCY_DIGITS
            && account.len() >= MIN_ACCOUNT_DIGITS
            && page_digits.contains(&agency)
            && page_digits.contains(&account)
    })
}

/// Longest full name found in the text, so "Ana Silva Santos" beats "Ana Silva".
fn match_by_name<'a>(normalized_text: &str, roster: &'a [RosterEntry]) -> Option<&'a RosterEntry> {
    roster
        .iter()
        .filter_map(|entry| {
            let name = normalize_text(&entry.full_name);
            (!name.is_empty() && normalized_text.contains(&name)).then_some((name.len(), entry))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, entry)| entry)
}

fn cbo_present(page_text: &str, entry: &RosterEntry) -> bool {
    entry
        .cbo
        .as_deref()
        .map(str::trim)
        .filter(|cbo| !cbo.is_empty())
        .is_some_and(|cbo| page_text.contains(cbo))
}

/// A labelled code on the page that is not the collaborator's own.
fn foreign_labelled_cbo(page_text: &str, entry: &RosterEntry) -> Option<String> {
    let own = entry.cbo.as_deref().map(digits_only).filter(|cbo| !cbo.is_empty())?;
    labelled_cbo_pattern()
        .captures_iter(page_text)
        .filter_map(|caps| caps.get(1))
        .map(|code| code.as_str().to_string())
        .find(|code| digits_only(code) != own)
}

/// Name-matched collaborator's own code wins, since many collaborators share a CBO.
fn match_by_cbo<'a>(
    page_text: &str,
    roster: &'a [RosterEntry],
    by_name: Option<&'a RosterEntry>,
) -> Option<&'a RosterEntry> {
    if let Some(entry) = by_name.filter(|entry| cbo_present(page_text, entry)) {
        return Some(entry);
    }
    roster.iter().find(|entry| cbo_present(page_text, entry))
}

/// Pick the collaborator a scanned page belongs to.
pub fn find_collaborator_match(
    page_text: &str,
    category: DocumentCategory,
    roster: &[RosterEntry],
) -> MatchOutcome {
    match category {
        DocumentCategory::AttendanceSheet => {
            if let Some((entry, cpf)) = match_by_cpf(page_text, roster) {
                return MatchOutcome::perfect(entry, format!("CPF {cpf}"));
            }
        }
        DocumentCategory::BankReceipt => {
            if let Some(entry) = match_by_bank_account(page_text, roster) {
                return MatchOutcome::perfect(entry, "bank agency and account".to_string());
            }
        }
        DocumentCategory::Payslip | DocumentCategory::Other => {}
    }

    let normalized = normalize_text(page_text);
    let by_name = match_by_name(&normalized, roster);
    let by_cbo = match_by_cbo(page_text, roster, by_name);

    match (by_name, by_cbo) {
        (Some(named), Some(coded)) if named.id == coded.id => {
            MatchOutcome::perfect(named, "name and CBO".to_string())
        }
        (Some(named), Some(coded)) => MatchOutcome {
            match_type: MatchType::Divergence,
            matched: Some(named.clone()),
            detail: format!(
                "name points to {} but CBO points to {}",
                named.full_name, coded.full_name
            ),
        },
        (Some(named), None) => match foreign_labelled_cbo(page_text, named) {
            Some(code) => MatchOutcome {
                match_type: MatchType::Divergence,
                matched: Some(named.clone()),
                detail: format!(
                    "name points to {} but the page shows CBO {code}",
                    named.full_name
                ),
            },
            None => MatchOutcome {
                match_type: MatchType::NameOnly,
                matched: Some(named.clone()),
                detail: "name only".to_string(),
            },
        },
        (None, Some(coded)) if category == DocumentCategory::Payslip => MatchOutcome {
            match_type: MatchType::CboOnly,
            matched: Some(coded.clone()),
            detail: format!("CBO {} only", coded.cbo.as_deref().unwrap_or_default().trim()),
        },
        _ => MatchOutcome::none(),
    }
}
