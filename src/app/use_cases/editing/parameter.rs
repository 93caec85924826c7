use super::{apply_at, finish};
use crate::app::AppState;
use crate::core::{resolve_edit, SegmentParam, ViewValue};

/// Setzt einen Parameter des selektierten Segments (Wert in Anzeige-Einheiten).
///
/// Der Wert wird zuerst auf den Anzeige-Bereich geklemmt, dann unter
/// Beachtung der Sperre angewendet; Nachbarn werden lückenlos nachgeführt.
pub fn edit_parameter(state: &mut AppState, param: SegmentParam, value: ViewValue) {
    let Some((idx, segment)) = state.selected_segment() else {
        log::debug!("Parameteränderung ohne Selektion ignoriert");
        return;
    };
    let segment = *segment;
    let units = state.units();
    let lock = state.lock;

    let result = units
        .param_to_calc(&segment, param, value)
        .and_then(|(calc, clamp_warning)| {
            let edit = resolve_edit(&segment, param, calc, &lock)?;
            let (chain, warnings) = apply_at(&state.chain, idx, edit)?;
            Ok((chain, clamp_warning.into_iter().chain(warnings).collect()))
        });

    finish(state, &format!("Änderung {} (Segment {})", param, idx), result);
}

/// Schaltet die Sperre eines Parameters am selektierten Segment um.
pub fn toggle_lock(state: &mut AppState, param: SegmentParam) {
    let Some((_, segment)) = state.selected_segment() else {
        return;
    };
    let segment_type = segment.segment_type();
    if state.lock.toggle(segment_type, param) {
        match state.lock.locked() {
            Some(locked) => log::info!("Sperre gesetzt: {}", locked),
            None => log::info!("Sperre aufgehoben"),
        }
    }
}
