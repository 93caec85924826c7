use crate::records::RecordsDocument;
use std::path::PathBuf;

/// UI-bezogener Anwendungszustand
#[derive(Debug, Default)]
pub struct UiState {
    /// Ob der Save-Datei-Dialog geöffnet werden soll
    pub show_save_file_dialog: bool,
    /// Ob der Options-Dialog angezeigt wird
    pub show_options_dialog: bool,
    /// Pfad der aktuell geladenen Datei (für Save ohne Dialog)
    pub current_file_path: Option<PathBuf>,
    /// Zuletzt geladener bzw. gespeicherter Dateiinhalt
    pub last_saved: Option<RecordsDocument>,
    /// Letzte Warnung oder Fehlermeldung für die Statusleiste
    pub status_message: Option<String>,
}

impl UiState {
    /// Erstellt den Standard-UI-Zustand (alle Dialoge geschlossen).
    pub fn new() -> Self {
        Self {
            show_save_file_dialog: false,
            show_options_dialog: false,
            current_file_path: None,
            last_saved: None,
            status_message: None,
        }
    }
}
