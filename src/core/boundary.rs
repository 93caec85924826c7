//! Grenzoperationen zwischen zwei benachbarten Segmenten.
//!
//! Anchor, Connect und Match-Slope verändern ausschließlich die Form des
//! aktuellen Segments; Indizes und Nachbarsegment bleiben unberührt. Das
//! Ergebnis ist ein [`Edit`], das der Aufrufer in die Kette übernimmt.

use super::chain::SegmentChain;
use super::error::EditError;
use super::segment::{Edit, Segment, SegmentType};

/// Richtung des Nachbarsegments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Vorheriges Segment (gemeinsame Grenze am Start)
    Previous,
    /// Nächstes Segment (gemeinsame Grenze am Ende)
    Next,
}

/// Aktuelles Segment plus Grenzwert des Nachbarn.
fn boundary_value(
    chain: &SegmentChain,
    seg_idx: usize,
    direction: Direction,
) -> Result<(Segment, f64), EditError> {
    let current = *chain.segment(seg_idx)?;
    let neighbor_idx = match direction {
        Direction::Previous => seg_idx.checked_sub(1),
        Direction::Next => Some(seg_idx + 1),
    };
    let neighbor = *neighbor_idx
        .and_then(|idx| chain.get(idx))
        .ok_or(EditError::NoNeighbor)?;

    let (left, right) = match direction {
        Direction::Previous => (neighbor, current),
        Direction::Next => (current, neighbor),
    };
    if left.end_idx() + 1 != right.start_idx() {
        return Err(EditError::InconsistentIndices {
            left_end: left.end_idx(),
            right_start: right.start_idx(),
        });
    }

    if current.segment_type() == SegmentType::Empty {
        return Err(EditError::IncompatibleNeighbor {
            reason: "leeres Segment besitzt keine Rate",
        });
    }
    let value = match direction {
        Direction::Previous => neighbor.q_end(),
        Direction::Next => neighbor.q_start(),
    }
    .ok_or(EditError::IncompatibleNeighbor {
        reason: "Nachbarsegment ist leer",
    })?;
    if !(value > 0.0) {
        return Err(EditError::IncompatibleNeighbor {
            reason: "Grenzrate des Nachbarn ist nicht positiv",
        });
    }
    Ok((current, value))
}

/// Formt das aktuelle Segment so um, dass sein Grenzwert dem des Nachbarn
/// entspricht; der gegenüberliegende Grenzwert bleibt erhalten.
///
/// - `Previous`: `q_start` wird gesetzt, `q_end` bleibt (Form wird gelöst)
/// - `Next`: `q_end` wird gesetzt, `q_start` bleibt
pub fn anchor(
    chain: &SegmentChain,
    seg_idx: usize,
    direction: Direction,
) -> Result<Edit, EditError> {
    let (current, value) = boundary_value(chain, seg_idx, direction)?;
    match direction {
        Direction::Previous => {
            let edit = current.change_q_start(value)?;
            match current.q_end() {
                Some(q_end) if current.segment_type() != SegmentType::Flat => {
                    edit.and_then(|segment| segment.change_q_end(q_end))
                }
                _ => Ok(edit),
            }
        }
        Direction::Next => current.change_q_end(value),
    }
}

/// Verschiebt das aktuelle Segment bei unveränderter Form, bis es an der
/// gemeinsamen Grenze den Wert des Nachbarn annimmt.
pub fn connect(
    chain: &SegmentChain,
    seg_idx: usize,
    direction: Direction,
) -> Result<Edit, EditError> {
    let (current, value) = boundary_value(chain, seg_idx, direction)?;
    match direction {
        Direction::Previous => current.change_q_start(value),
        Direction::Next => current.translate_to_q_end(value),
    }
}

/// Typen ohne frei wählbare Anfangssteigung.
fn slope_locked(segment_type: SegmentType) -> bool {
    matches!(
        segment_type,
        SegmentType::Flat | SegmentType::Empty | SegmentType::ExpInc
    )
}

/// Löst die Form des aktuellen Segments so, dass seine Steigung am Start der
/// Steigung des vorherigen Segments an dessen Ende entspricht.
pub fn match_slope(chain: &SegmentChain, seg_idx: usize) -> Result<Edit, EditError> {
    let current = *chain.segment(seg_idx)?;
    if seg_idx == 0 {
        return Err(EditError::NoPreviousSegment);
    }
    if slope_locked(current.segment_type()) {
        return Err(EditError::SlopeNotMatchable(current.segment_type()));
    }
    let prev = *chain.segment(seg_idx - 1)?;
    if slope_locked(prev.segment_type()) {
        return Err(EditError::PreviousNotSlopeCompatible(prev.segment_type()));
    }
    if prev.end_idx() + 1 != current.start_idx() {
        return Err(EditError::InconsistentIndices {
            left_end: prev.end_idx(),
            right_start: current.start_idx(),
        });
    }

    let slope = prev.derivative_at(prev.end_idx());
    current.change_initial_slope(slope)
}
