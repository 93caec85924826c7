//! Use-Case-Funktionen für Dateiaktionen.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use crate::app::{AppState, SelectionState};
use crate::core::{LockState, SegmentChain};
use crate::records::{parse_records_document, write_records_document, RecordsDocument};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

/// Lädt die ausgewählte Datensatz-Datei in den AppState.
///
/// Ungültige Datensätze ergeben eine leere Kette; die Sitzung bleibt benutzbar.
pub fn load_selected_file(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Datei {} konnte nicht gelesen werden", path.display()))?;
    let document = parse_records_document(&content)
        .with_context(|| format!("Datei {} konnte nicht geparst werden", path.display()))?;

    let chain = document.to_chain();
    log::info!(
        "Kette geladen: {} Segmente aus {}",
        chain.len(),
        path.display()
    );
    state.ui.status_message = (chain.is_empty() && !document.segments.is_empty())
        .then(|| "Segment-Datensätze ungültig, leere Kette geladen".to_string());

    replace_chain(state, chain);
    state.termination = document.termination;
    state.ui.last_saved = Some(RecordsDocument::from_chain(&state.chain, state.termination));
    state.ui.current_file_path = Some(path);
    Ok(())
}

/// Beginnt eine neue, leere Kette ohne Dateibezug.
pub fn new_chain(state: &mut AppState, relative_time: bool) {
    replace_chain(state, SegmentChain::new(relative_time));
    state.termination = None;
    state.ui.current_file_path = None;
    state.ui.last_saved = None;
    state.ui.status_message = None;
    log::info!("Neue Kette (relativ={})", relative_time);
}

/// Ersetzt die Kette vollständig; die History beginnt neu.
fn replace_chain(state: &mut AppState, chain: SegmentChain) {
    state.reset_history();
    state.lock = chain
        .first()
        .map_or(LockState::none(), |s| LockState::default_for(s.segment_type()));
    state.selection = SelectionState {
        selected_segment: (!chain.is_empty()).then_some(0),
    };
    state.chain = Arc::new(chain);
    state.view.bump_revision();
}

/// Öffnet den Save-Datei-Dialog über UI-State.
pub fn request_save_file(state: &mut AppState) {
    state.ui.show_save_file_dialog = true;
}

/// Speichert die Kette unter `path` bzw. dem aktuellen Dateipfad.
///
/// Ohne bekannten Pfad wird der Dialog angefordert. Unveränderte Daten am
/// selben Pfad werden nicht erneut geschrieben.
pub fn save(state: &mut AppState, path: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(target) = path.or_else(|| state.ui.current_file_path.clone()) else {
        request_save_file(state);
        return Ok(());
    };
    state.settle_session();

    let document = RecordsDocument::from_chain(&state.chain, state.termination);
    let same_path = state.ui.current_file_path.as_ref() == Some(&target);
    if same_path && state.ui.last_saved.as_ref() == Some(&document) {
        log::info!("Keine Änderungen, Speichern übersprungen: {}", target.display());
        return Ok(());
    }

    let content = write_records_document(&document)?;
    std::fs::write(&target, content)
        .with_context(|| format!("Datei {} konnte nicht geschrieben werden", target.display()))?;
    log::info!("Datei gespeichert: {}", target.display());

    state.ui.current_file_path = Some(target);
    state.ui.last_saved = Some(document);
    state.ui.show_save_file_dialog = false;
    Ok(())
}
