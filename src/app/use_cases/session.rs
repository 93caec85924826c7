//! Use-Case-Funktionen der Tastatur-Sitzung.
//!
//! Jeder Schritt mutiert die Kette direkt (Copy-on-Write über
//! `Arc::make_mut`); erst der Commit legt den Zustand vor dem ersten
//! Schritt als einen History-Eintrag ab.

use crate::app::history::Snapshot;
use crate::app::session::{KeyCombo, SessionEvent, SessionPhase, StepCommand, StepTarget};
use crate::app::AppState;
use crate::core::{
    resolve_edit, BoundarySide, EditError, LockState, RangeWarning, SegmentChain, SegmentParam,
};
use std::sync::Arc;
use std::time::Instant;

/// Taste gedrückt: erster Schritt sofort.
///
/// Schritte eines vorherigen, noch nicht übernommenen Haltens werden vorher
/// als eigener History-Eintrag abgeschlossen.
pub fn begin_step(state: &mut AppState, combo: KeyCombo, now: Instant) {
    if let SessionPhase::Committing { .. } = state.session.phase() {
        state.settle_session();
    }
    match state.session.press(combo, now) {
        Ok(event) => handle_event(state, event),
        Err(e) => {
            log::warn!("{}", e);
            state.ui.status_message = Some(e.to_string());
        }
    }
}

/// Taste losgelassen: Commit nach der Ruhezeit.
pub fn end_step(state: &mut AppState, now: Instant) {
    state.session.release(now);
}

/// Treibt die Sitzung mit dem aktuellen Zeitstempel voran.
pub fn poll(state: &mut AppState, now: Instant) {
    if let Some(event) = state.session.poll(now) {
        handle_event(state, event);
    }
}

/// Bricht die Beschleunigung ab; angewendete Schritte bleiben erhalten.
pub fn cancel(state: &mut AppState) {
    state.settle_session();
}

fn handle_event(state: &mut AppState, event: SessionEvent) {
    match event {
        SessionEvent::Step { command, amount } => apply_step(state, command, amount),
        SessionEvent::Commit => {
            if state.commit_pending() {
                log::info!("Tastatur-Schritte übernommen");
            }
        }
    }
}

/// Wendet einen Schritt an; abgelehnte Schritte sind No-ops.
fn apply_step(state: &mut AppState, command: StepCommand, amount: i64) {
    if state.chain.is_empty() {
        log::debug!("Schritt ohne Segmente ignoriert");
        return;
    }
    let selected = state
        .selection
        .selected_segment
        .filter(|idx| *idx < state.chain.len());
    if selected.is_none() && !command.target.is_bulk() {
        log::debug!("Schritt ohne Selektion ignoriert");
        return;
    }

    let before = state
        .pending_commit
        .is_none()
        .then(|| Snapshot::from_state(state));
    match step_chain(state, command, amount, selected) {
        Ok(warnings) => {
            for warning in &warnings {
                log::debug!("Schritt geklemmt: {}", warning);
            }
            if before.is_some() {
                state.pending_commit = before;
            }
            state.session.note_step_applied();
        }
        Err(e) => log::debug!("Schritt {:?} verworfen: {}", command.target, e),
    }
}

fn step_chain(
    state: &mut AppState,
    command: StepCommand,
    amount: i64,
    selected: Option<usize>,
) -> Result<Vec<RangeWarning>, EditError> {
    let offset = command.direction * amount;
    let factor = (1.0 + state.options.q_step_fraction).powi(offset as i32);
    let lock = state.lock;
    let chain = Arc::make_mut(&mut state.chain);
    let selected = selected.unwrap_or(0);

    match command.target {
        StepTarget::EndIdx => step_boundary(chain, selected, BoundarySide::End, offset, &lock),
        StepTarget::StartIdx => step_boundary(chain, selected, BoundarySide::Start, offset, &lock),
        StepTarget::AllDates => {
            chain.shift_all(offset);
            Ok(Vec::new())
        }
        StepTarget::QStart => {
            let segment = *chain.segment(selected)?;
            let q_start = segment.q_start().ok_or(EditError::ParameterNotApplicable {
                param: SegmentParam::QStart,
                segment_type: segment.segment_type(),
            })?;
            let edit = resolve_edit(&segment, SegmentParam::QStart, q_start * factor, &lock)?;
            chain.apply_edit(selected, edit.segment)?;
            Ok(edit.warnings)
        }
        StepTarget::AllQStarts => chain.scale_q_starts(factor),
    }
}

/// Index-Schritt unter Beachtung der Sperre.
///
/// Das Segment wird wie bei einer direkten Eingabe aufgelöst, der Nachbar an
/// der bewegten Grenze folgt. Geklemmte Schritte werden verworfen.
fn step_boundary(
    chain: &mut SegmentChain,
    selected: usize,
    side: BoundarySide,
    offset: i64,
    lock: &LockState,
) -> Result<Vec<RangeWarning>, EditError> {
    let segment = *chain.segment(selected)?;
    let (param, target) = match side {
        BoundarySide::End => (SegmentParam::EndIdx, segment.end_idx() + offset),
        BoundarySide::Start => (SegmentParam::StartIdx, segment.start_idx() + offset),
    };
    let edit = resolve_edit(&segment, param, target as f64, lock)?;
    let moved = match side {
        BoundarySide::End => edit.segment.end_idx(),
        BoundarySide::Start => edit.segment.start_idx(),
    };
    if moved != target {
        return Err(EditError::SpanTooShort { index: selected });
    }
    chain.replace_at_boundary(selected, side, edit.segment)?;
    Ok(edit.warnings)
}
