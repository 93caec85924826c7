use super::{apply_at, finish};
use crate::app::AppState;
use crate::core::{boundary, Direction};

/// Gleicht den Grenzwert des selektierten Segments an den Nachbarn an.
pub fn anchor(state: &mut AppState, direction: Direction) {
    let Some((idx, _)) = state.selected_segment() else {
        return;
    };
    let result = boundary::anchor(&state.chain, idx, direction)
        .and_then(|edit| apply_at(&state.chain, idx, edit));
    finish(state, &format!("Anchor {:?}", direction), result);
}

/// Schiebt das selektierte Segment an den Nachbarn heran.
pub fn connect(state: &mut AppState, direction: Direction) {
    let Some((idx, _)) = state.selected_segment() else {
        return;
    };
    let result = boundary::connect(&state.chain, idx, direction)
        .and_then(|edit| apply_at(&state.chain, idx, edit));
    finish(state, &format!("Connect {:?}", direction), result);
}

/// Gleicht die Anfangssteigung an das vorherige Segment an.
pub fn match_slope(state: &mut AppState) {
    let Some((idx, _)) = state.selected_segment() else {
        return;
    };
    let result = boundary::match_slope(&state.chain, idx)
        .and_then(|edit| apply_at(&state.chain, idx, edit));
    finish(state, "Match-Slope", result);
}
