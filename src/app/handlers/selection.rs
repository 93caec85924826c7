//! Handler für Selektions-Operationen.

use crate::app::use_cases;
use crate::app::AppState;

/// Selektiert ein Segment der Kette.
pub fn select(state: &mut AppState, index: usize) {
    use_cases::selection::select_segment(state, index);
}
