use super::{finish, reject};
use crate::app::AppState;
use crate::core::{LockState, SegmentType};

/// Fügt ein Standardsegment vorne oder hinten an und selektiert es.
pub fn add_segment(state: &mut AppState, segment_type: SegmentType, at_end: bool) {
    let mut chain = (*state.chain).clone();
    let defaults = state.options.segment_defaults();
    let max_segments = state.options.max_segments;
    let index = match chain.add_segment(segment_type, at_end, max_segments, &defaults) {
        Ok(index) => index,
        Err(e) => {
            reject(state, "Segment hinzufügen", &e);
            return;
        }
    };

    let operation = format!("Segment {} hinzufügen", segment_type);
    if finish(state, &operation, Ok((chain, Vec::new()))) {
        state.selection.selected_segment = Some(index);
        state.lock = LockState::default_for(segment_type);
    }
}

/// Entfernt das selektierte Segment (nur erstes oder letztes).
pub fn remove_selected_segment(state: &mut AppState) {
    let Some((idx, _)) = state.selected_segment() else {
        return;
    };
    let mut chain = (*state.chain).clone();
    if let Err(e) = chain.remove_segment(idx, state.options.min_segments) {
        reject(state, "Segment entfernen", &e);
        return;
    }

    let remaining = chain.len();
    if finish(state, "Segment entfernen", Ok((chain, Vec::new()))) {
        state.selection.selected_segment = match remaining {
            0 => None,
            _ if idx == 0 => Some(0),
            _ => Some(remaining - 1),
        };
        let selected_type = state.selected_segment().map(|(_, s)| s.segment_type());
        if let Some(segment_type) = selected_type {
            state.lock.reset_for(segment_type);
        }
    }
}
