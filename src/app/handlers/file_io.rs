//! Handler für Datei-Operationen (Laden, Speichern, neue Kette).

use crate::app::use_cases;
use crate::app::AppState;
use std::path::PathBuf;

/// Lädt eine Kette aus dem übergebenen Pfad.
pub fn load(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    use_cases::file_io::load_selected_file(state, path)
}

/// Speichert die Kette.
///
/// `None` speichert unter dem aktuell bekannten Pfad (oder öffnet den Dialog).
/// `Some(p)` speichert explizit unter dem neuen Pfad `p`.
pub fn save(state: &mut AppState, path: Option<PathBuf>) -> anyhow::Result<()> {
    use_cases::file_io::save(state, path)
}

/// Beginnt eine neue, leere Kette.
pub fn new_chain(state: &mut AppState, relative_time: bool) {
    use_cases::file_io::new_chain(state, relative_time);
}
