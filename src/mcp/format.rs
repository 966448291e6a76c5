//! Text reports returned by the MCP tools.

use std::fmt::Write as _;

use crate::{processing::UploadOutcome, remote::ArtifactRecord};

const UNKNOWN: &str = "Unknown";
/// Longest summary shown in the listing before truncation.
pub(crate) const LIST_SUMMARY_LIMIT: usize = 150;

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|text| !text.trim().is_empty()).unwrap_or(UNKNOWN)
}

fn format_size(bytes: Option<u64>) -> String {
    bytes
        .map(|size| format!("{size} bytes"))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Shorten `text` to `limit` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_summary(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(limit).collect();
    shortened.push_str("...");
    shortened
}

/// Render the result of `upload_and_process`.
pub(crate) fn upload_report(outcome: &UploadOutcome) -> String {
    match outcome {
        UploadOutcome::Resolved { upload_id, record } => {
            let mut report = String::from("Document processed successfully.\n\n");
            let _ = writeln!(report, "File: {}", record.file_name);
            let _ = writeln!(
                report,
                "Classification: {}",
                or_unknown(record.file_class.as_deref())
            );
            let _ = writeln!(
                report,
                "Organization: {}",
                or_unknown(record.owner_organization_name.as_deref())
            );
            let _ = writeln!(report, "Summary: {}", or_unknown(record.summary.as_deref()));
            let _ = writeln!(report, "Upload ID: {upload_id}");
            let _ = writeln!(report, "File ID: {}", or_unknown(record.file_id.as_deref()));
            let _ = writeln!(report, "Size: {}", format_size(record.file_size_bytes));
            let _ = writeln!(report, "Status: {}", record.status.as_str());
            let _ = write!(
                report,
                "Created: {}",
                or_unknown(record.created_at.as_deref())
            );
            report
        }
        UploadOutcome::Pending {
            upload_id,
            file_name,
        } => format!(
            "Document uploaded; processing is still running.\n\nFile: {file_name}\nUpload ID: {upload_id}\nStatus: still processing. Check again later with list_files or get_file_details."
        ),
    }
}

/// Render the artifact listing for `list_files`.
pub(crate) fn list_report(records: &[ArtifactRecord]) -> String {
    if records.is_empty() {
        return "No files found.".to_string();
    }

    let mut report = format!("Found {} file(s):\n", records.len());
    for (index, record) in records.iter().enumerate() {
        let _ = write!(
            report,
            "\n{}. {}\n   Status: {} | Class: {} | Organization: {}\n   File ID: {}\n",
            index + 1,
            record.file_name,
            record.status.as_str(),
            or_unknown(record.file_class.as_deref()),
            or_unknown(record.owner_organization_name.as_deref()),
            or_unknown(record.file_id.as_deref()),
        );
        if let Some(summary) = record.summary.as_deref().filter(|text| !text.trim().is_empty()) {
            let _ = writeln!(
                report,
                "   Summary: {}",
                truncate_summary(summary, LIST_SUMMARY_LIMIT)
            );
        }
    }
    report.trim_end().to_string()
}

/// Render full metadata for `get_file_details`.
pub(crate) fn details_report(record: &ArtifactRecord) -> String {
    let mut report = format!("File details: {}\n\n", record.file_name);
    let fields: [(&str, String); 14] = [
        ("File ID", or_unknown(record.file_id.as_deref()).to_string()),
        ("Upload ID", or_unknown(record.upload_id.as_deref()).to_string()),
        ("Status", record.status.as_str().to_string()),
        (
            "Classification",
            or_unknown(record.file_class.as_deref()).to_string(),
        ),
        (
            "Organization",
            or_unknown(record.owner_organization_name.as_deref()).to_string(),
        ),
        ("Size", format_size(record.file_size_bytes)),
        ("Created", or_unknown(record.created_at.as_deref()).to_string()),
        ("Updated", or_unknown(record.updated_at.as_deref()).to_string()),
        ("Schema ID", or_unknown(record.schema_id.as_deref()).to_string()),
        (
            "Reference ID",
            or_unknown(record.reference_id.as_deref()).to_string(),
        ),
        (
            "Duplicate",
            if record.is_duplicate { "yes" } else { "no" }.to_string(),
        ),
        (
            "Content hash",
            or_unknown(record.content_hash.as_deref()).to_string(),
        ),
        (
            "Storage path",
            or_unknown(record.storage_path.as_deref()).to_string(),
        ),
        ("Summary", or_unknown(record.summary.as_deref()).to_string()),
    ];
    for (label, value) in fields {
        let _ = writeln!(report, "{label}: {value}");
    }
    report.trim_end().to_string()
}

/// Render a failure report.
pub(crate) fn error_report(message: impl std::fmt::Display) -> String {
    format!("Error: {message}")
}
