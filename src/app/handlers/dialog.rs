//! Handler für Optionen und Anwendungssteuerung.

use crate::app::session::SessionTiming;
use crate::app::AppState;
use crate::shared::EditorOptions;

/// Markiert die Anwendung zum Beenden im nächsten Frame.
pub fn request_exit(state: &mut AppState) {
    state.settle_session();
    state.should_exit = true;
}

/// Übernimmt neue Optionen und persistiert sie in der Konfigurationsdatei.
pub fn apply_options(state: &mut AppState, options: EditorOptions) -> anyhow::Result<()> {
    set_options(state, options);
    let path = EditorOptions::config_path();
    state.options.save_to_file(&path)
}

/// Setzt Optionen auf Standardwerte zurück und persistiert sie.
pub fn reset_options(state: &mut AppState) -> anyhow::Result<()> {
    set_options(state, EditorOptions::default());
    let path = EditorOptions::config_path();
    state.options.save_to_file(&path)
}

fn set_options(state: &mut AppState, options: EditorOptions) {
    state.session.set_timing(SessionTiming::from_options(&options));
    state.options = options;
    state.view.bump_revision();
}
