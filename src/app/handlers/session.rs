//! Handler für die Tastatur-Sitzung (gehaltene Pfeiltasten).

use crate::app::session::KeyCombo;
use crate::app::use_cases;
use crate::app::AppState;
use std::time::Instant;

/// Startet eine gehaltene Taste.
pub fn begin(state: &mut AppState, combo: KeyCombo, now: Instant) {
    use_cases::session::begin_step(state, combo, now);
}

/// Beendet eine gehaltene Taste.
pub fn end(state: &mut AppState, now: Instant) {
    use_cases::session::end_step(state, now);
}

/// Treibt die Sitzung voran (Schritte bzw. verzögerter Commit).
pub fn poll(state: &mut AppState, now: Instant) {
    use_cases::session::poll(state, now);
}

/// Bricht die Sitzung ab.
pub fn cancel(state: &mut AppState) {
    use_cases::session::cancel(state);
}
