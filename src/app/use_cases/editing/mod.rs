//! Use-Case-Funktionen für das Editieren der Segmentkette.
//!
//! Aufgeteilt nach Operation:
//! - `parameter`: Parameteränderung und Sperren
//! - `boundary`: Anchor, Connect, Match-Slope
//! - `structure`: Segmente anfügen und entfernen
//! - `termination`: Terminierung und Endkriterium
//!
//! Jede Operation rechnet auf einer Kopie der Kette und übernimmt das
//! Ergebnis erst nach Erfolg. Abgelehnte Operationen lassen den Zustand
//! unverändert und landen in der Statusleiste.

mod boundary;
mod parameter;
mod structure;
mod termination;

pub use boundary::{anchor, connect, match_slope};
pub use parameter::{edit_parameter, toggle_lock};
pub use structure::{add_segment, remove_selected_segment};
pub use termination::{apply_termination, set_end_criterion, set_termination_input};

use crate::app::AppState;
use crate::core::{Edit, EditError, RangeWarning, SegmentChain};

/// Neue Kette plus gesammelte Bereichswarnungen.
pub(crate) type ChainEdit = Result<(SegmentChain, Vec<RangeWarning>), EditError>;

/// Übernimmt das Segment-Ergebnis an Position `idx` in eine Kopie der Kette.
pub(crate) fn apply_at(chain: &SegmentChain, idx: usize, edit: Edit) -> ChainEdit {
    let mut next = chain.clone();
    next.apply_edit(idx, edit.segment)?;
    Ok((next, edit.warnings))
}

/// Übernimmt ein Ergebnis als abgeschlossene Änderung oder meldet die Ablehnung.
///
/// Gibt `true` zurück, wenn die Kette geändert wurde.
pub(crate) fn finish(state: &mut AppState, operation: &str, result: ChainEdit) -> bool {
    match result {
        Ok((chain, warnings)) => {
            if chain == *state.chain {
                log::debug!("{}: keine Änderung", operation);
                report_warnings(state, &warnings);
                return false;
            }
            state.commit_chain(chain);
            state.ui.status_message = None;
            report_warnings(state, &warnings);
            log::info!("{} ausgeführt", operation);
            true
        }
        Err(e) => {
            reject(state, operation, &e);
            false
        }
    }
}

/// Meldet eine abgelehnte Operation.
pub(crate) fn reject(state: &mut AppState, operation: &str, error: &EditError) {
    log::warn!("{} abgelehnt: {}", operation, error);
    state.ui.status_message = Some(format!("{}: {}", operation, error));
}

/// Meldet geklemmte Werte; die letzte Warnung bleibt in der Statusleiste.
pub(crate) fn report_warnings(state: &mut AppState, warnings: &[RangeWarning]) {
    for warning in warnings {
        log::warn!("{}", warning);
    }
    if let Some(last) = warnings.last() {
        state.ui.status_message = Some(last.to_string());
    }
}
