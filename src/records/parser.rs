//! Parser für Datensatz-Dateien.

use super::RecordsDocument;
use anyhow::{bail, Context, Result};

/// Parsed eine Datensatz-Datei aus einem JSON-String
pub fn parse_records_document(content: &str) -> Result<RecordsDocument> {
    let document: RecordsDocument =
        serde_json::from_str(content).context("Datensatz-Datei ist kein gültiges JSON")?;

    if document.version > RecordsDocument::CURRENT_VERSION {
        bail!(
            "Datensatz-Version {} wird nicht unterstützt (maximal {})",
            document.version,
            RecordsDocument::CURRENT_VERSION
        );
    }

    log::debug!(
        "Datensatz-Datei gelesen: {} Segmente, relativ={}",
        document.segments.len(),
        document.relative_time
    );
    Ok(document)
}
