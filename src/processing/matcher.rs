//! Resolve a freshly uploaded file against an artifact listing.

use std::path::Path;

use crate::remote::{ArtifactRecord, UploadTicket};

/// Find the listing entry corresponding to an upload.
///
/// Rules are tried in order and the first hit wins, scanning the listing front to back:
/// 1. the stored name contains the uploaded file's stem (case-sensitive), since the backend may
///    decorate stored names;
/// 2. the record carries the ticket's upload id.
///
/// An empty stem never satisfies rule 1.
pub fn match_artifact<'a>(
    records: &'a [ArtifactRecord],
    uploaded_file_name: &str,
    ticket: &UploadTicket,
) -> Option<&'a ArtifactRecord> {
    let stem = file_stem(uploaded_file_name);

    let by_name = (!stem.is_empty())
        .then(|| records.iter().find(|record| record.file_name.contains(stem)))
        .flatten();

    by_name.or_else(|| {
        records
            .iter()
            .find(|record| record.upload_id.as_deref() == Some(ticket.upload_id.as_str()))
    })
}

/// Return the first record whose name contains `query`, ignoring case.
pub fn find_by_name<'a>(records: &'a [ArtifactRecord], query: &str) -> Option<&'a ArtifactRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .find(|record| record.file_name.to_lowercase().contains(&needle))
}

fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
}
