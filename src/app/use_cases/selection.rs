//! Use-Case-Funktionen für die Segment-Selektion.

use crate::app::AppState;

/// Selektiert ein Segment; die Sperre wird an dessen Typ angepasst.
pub fn select_segment(state: &mut AppState, index: usize) {
    let Some(segment_type) = state.chain.get(index).map(|s| s.segment_type()) else {
        log::debug!("Segment {} existiert nicht, Selektion unverändert", index);
        return;
    };
    state.settle_session();
    if state.selection.selected_segment == Some(index) {
        return;
    }
    state.selection.selected_segment = Some(index);
    state.lock.reset_for(segment_type);
    log::debug!("Segment {} ({}) selektiert", index, segment_type);
}
