use serde::Serialize;

use super::DocumentCategory;

const PAYSLIP_MARKERS: &[&str] = &[
    "recibo de pagamento de salário",
    "demonstrativo de pagamento",
    "holerite",
    "total de vencimentos",
];

const BANK_RECEIPT_MARKERS: &[&str] = &[
    "comprovante de transferência",
    "comprovante de pix",
    "transferência realizada",
    "ted realizada",
];

const ATTENDANCE_MARKERS: &[&str] = &["folha de ponto", "cartão de ponto", "espelho de ponto"];

/// A page declared as one category that carries another category's markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAnomaly {
    pub keyword: &'static str,
    pub looks_like: DocumentCategory,
}

fn markers(category: DocumentCategory) -> &'static [&'static str] {
    match category {
        DocumentCategory::Payslip => PAYSLIP_MARKERS,
        DocumentCategory::BankReceipt => BANK_RECEIPT_MARKERS,
        DocumentCategory::AttendanceSheet => ATTENDANCE_MARKERS,
        DocumentCategory::Other => &[],
    }
}

/// Markers of every other category are forbidden for `declared`. `Other` is never checked.
pub fn detect_category_anomaly(
    page_text: &str,
    declared: DocumentCategory,
) -> Option<CategoryAnomaly> {
    if declared == DocumentCategory::Other {
        return None;
    }

    let haystack = page_text.to_lowercase();
    [
        DocumentCategory::Payslip,
        DocumentCategory::BankReceipt,
        DocumentCategory::AttendanceSheet,
    ]
    .into_iter()
    .filter(|candidate| *candidate != declared)
    .find_map(|candidate| {
        markers(candidate)
            .iter()
            .find(|keyword| haystack.contains(*keyword))
            .map(|keyword| CategoryAnomaly {
                keyword: *keyword,
                looks_like: candidate,
            })
    })
}
