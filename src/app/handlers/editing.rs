//! Handler für Parameter-, Grenz- und Struktur-Operationen.

use crate::app::use_cases;
use crate::app::AppState;
use crate::core::{Direction, EndCriterion, QFinalDict, SegmentParam, SegmentType, ViewValue};

/// Setzt einen Parameter des selektierten Segments.
pub fn edit_parameter(state: &mut AppState, param: SegmentParam, value: ViewValue) {
    use_cases::editing::edit_parameter(state, param, value);
}

/// Schaltet die Sperre eines Parameters um.
pub fn toggle_lock(state: &mut AppState, param: SegmentParam) {
    use_cases::editing::toggle_lock(state, param);
}

pub fn anchor(state: &mut AppState, direction: Direction) {
    use_cases::editing::anchor(state, direction);
}

pub fn connect(state: &mut AppState, direction: Direction) {
    use_cases::editing::connect(state, direction);
}

pub fn match_slope(state: &mut AppState) {
    use_cases::editing::match_slope(state);
}

/// Fügt ein Segment an und selektiert es.
pub fn add_segment(state: &mut AppState, segment_type: SegmentType, at_end: bool) {
    use_cases::editing::add_segment(state, segment_type, at_end);
}

/// Entfernt das selektierte Segment.
pub fn remove_selected(state: &mut AppState) {
    use_cases::editing::remove_selected_segment(state);
}

pub fn set_termination_input(state: &mut AppState, input: Option<QFinalDict>) {
    use_cases::editing::set_termination_input(state, input);
}

/// Terminiert das letzte Segment.
pub fn apply_termination(state: &mut AppState) {
    use_cases::editing::apply_termination(state);
}

pub fn set_end_criterion(state: &mut AppState, criterion: EndCriterion) {
    use_cases::editing::set_end_criterion(state, criterion);
}
