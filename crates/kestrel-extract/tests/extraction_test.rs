//! End-to-end extraction tests against documents on disk.

use kestrel_extract::{ExtractError, KpiExtractor, KpiMappings, extract_from_filings};
use std::fs;
use std::io::Write;

const MAPPINGS: &str = r#"{
    "PPL": {
        "EBITDA": {
            "patterns": [
                "Adjusted EBITDA increased to \\$?([0-9,]+) million",
                "Adjusted EBITDA[^0-9]*\\$?([0-9,]+) million"
            ],
            "unit": "CAD millions",
            "prefer": "Adjusted"
        },
        "FFO": {
            "patterns": ["Funds From Operations were \\$?([0-9,]+) million"],
            "unit": "CAD millions"
        },
        "NetDebt": {
            "patterns": ["Net Debt[^$]*\\$([0-9,]+) million"],
            "unit": "CAD millions"
        },
        "InterestExpense": {
            "patterns": ["Interest Expense[^0-9]*\\$?([0-9,]+) million"],
            "unit": "CAD millions"
        },
        "MaintenanceCapex": {
            "patterns": ["Maintenance capital expenditures were \\$?([0-9,]+) million"],
            "unit": "CAD millions"
        }
    }
}"#;

const SAMPLE_FILING: &str = "\
PEMBINA PIPELINE CORPORATION
Management's Discussion and Analysis
For the three and six months ended June 30, 2024

FINANCIAL HIGHLIGHTS

Adjusted EBITDA increased to $3,450 million for the six months ended June 30, 2024,
compared to $3,120 million in the prior year period.

Funds From Operations were $2,890 million for the six months ended June 30, 2024,
up from $2,650 million in the prior year.

Net Debt at June 30, 2024 was $18,750 million, compared to $17,920 million at December 31, 2023.

Interest Expense for the six months was $380 million, compared to $360 million in the prior year.

Maintenance capital expenditures were $220 million for the quarter.
";

fn extractor() -> KpiExtractor {
    KpiExtractor::new(KpiMappings::from_json_str(MAPPINGS).unwrap())
}

#[test]
fn extracts_full_highlight_block_from_file() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "{}", SAMPLE_FILING).unwrap();

    let kpis = extractor().extract_from_file(file.path(), "PPL").unwrap();

    assert_eq!(kpis["EBITDA"].value, 3450.0);
    assert_eq!(kpis["EBITDA"].unit, "CAD millions");
    assert_eq!(kpis["FFO"].value, 2890.0);
    assert_eq!(kpis["NetDebt"].value, 18750.0);
    assert_eq!(kpis["InterestExpense"].value, 380.0);
    assert_eq!(kpis["MaintenanceCapex"].value, 220.0);

    // Citations point at the file and carry valid spans.
    let file_name = file.path().file_name().unwrap().to_str().unwrap();
    for kpi in kpis.values() {
        assert_eq!(kpi.citation.doc_id, file_name);
        assert_eq!(kpi.citation.page, 1);
        let (start, end) = kpi.citation.span;
        assert!(start <= end);
        assert!(end <= kpi.citation.text_preview.len());
    }
}

#[test]
fn empty_document_extracts_nothing() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let kpis = extractor().extract_from_file(file.path(), "PPL").unwrap();
    assert!(kpis.is_empty());
}

#[test]
fn unsupported_format_is_rejected() {
    let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
    let err = extractor()
        .extract_from_file(file.path(), "PPL")
        .unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
}

#[test]
fn later_filings_override_earlier_ones() {
    let dir = tempfile::tempdir().unwrap();

    fs::write(
        dir.path().join("ppl_2024_q1.txt"),
        "Adjusted EBITDA increased to $3,100 million for the quarter.\n\
         Funds From Operations were $2,650 million in the period.",
    )
    .unwrap();
    fs::write(
        dir.path().join("ppl_2024_q2.txt"),
        "Adjusted EBITDA increased to $3,450 million for the quarter.",
    )
    .unwrap();
    // A different ticker's filing is ignored entirely.
    fs::write(
        dir.path().join("enb_2024_q2.txt"),
        "Adjusted EBITDA increased to $9,999 million.",
    )
    .unwrap();

    let merged = extract_from_filings(&extractor(), dir.path(), "PPL").unwrap();

    // Q2 overrides Q1 for EBITDA; FFO survives from Q1.
    assert_eq!(merged["EBITDA"].value, 3450.0);
    assert_eq!(merged["FFO"].value, 2650.0);
}

#[test]
fn corrupt_filing_does_not_abort_batch() {
    let dir = tempfile::tempdir().unwrap();

    // Non-UTF8 file triggers a read error for that filing only.
    fs::write(dir.path().join("ppl_bad.txt"), [0xff, 0xfe, 0x00]).unwrap();
    fs::write(
        dir.path().join("ppl_good.txt"),
        "Adjusted EBITDA increased to $3,450 million.",
    )
    .unwrap();

    let merged = extract_from_filings(&extractor(), dir.path(), "PPL").unwrap();
    assert_eq!(merged["EBITDA"].value, 3450.0);
}
