//! Sperr-Zustand und lock-bewusste Auflösung von Parameteränderungen.
//!
//! Pro aktivem Segment ist höchstens ein Parameter gesperrt. Eine Änderung an
//! einem anderen Parameter wird so aufgelöst, dass der gesperrte Wert erhalten
//! bleibt.

use super::error::EditError;
use super::segment::{Edit, Segment, SegmentParam, SegmentType};

/// Sperrbare Parameter eines Segmenttyps.
pub fn lockable_params(segment_type: SegmentType) -> &'static [SegmentParam] {
    use SegmentParam::*;
    match segment_type {
        SegmentType::Flat | SegmentType::Empty => &[],
        SegmentType::Linear => &[StartIdx, EndIdx, QEnd, K],
        SegmentType::ExpInc
        | SegmentType::ExpDec
        | SegmentType::Arps
        | SegmentType::ArpsModified => &[StartIdx, EndIdx, QEnd, DEff],
    }
}

/// Gesperrter Parameter des aktiven Segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockState {
    locked: Option<SegmentParam>,
}

impl LockState {
    /// Keine Sperre.
    pub fn none() -> Self {
        Self { locked: None }
    }

    /// Standardsperre eines Typs (`end_idx` außer für `flat`/`empty`).
    pub fn default_for(segment_type: SegmentType) -> Self {
        let locked = lockable_params(segment_type)
            .contains(&SegmentParam::EndIdx)
            .then_some(SegmentParam::EndIdx);
        Self { locked }
    }

    pub fn locked(&self) -> Option<SegmentParam> {
        self.locked
    }

    /// Gesperrter Parameter, sofern er für den Typ gültig ist.
    pub fn effective_for(&self, segment_type: SegmentType) -> Option<SegmentParam> {
        self.locked
            .filter(|param| lockable_params(segment_type).contains(param))
    }

    /// Schaltet die Sperre eines Parameters um.
    ///
    /// Eine neue Sperre ersetzt jede andere; nicht sperrbare Parameter werden
    /// ignoriert. Liefert `true`, wenn sich der Zustand geändert hat.
    pub fn toggle(&mut self, segment_type: SegmentType, param: SegmentParam) -> bool {
        if !lockable_params(segment_type).contains(&param) {
            log::debug!("Parameter {} ist für {} nicht sperrbar", param, segment_type);
            return false;
        }
        self.locked = if self.locked == Some(param) {
            None
        } else {
            Some(param)
        };
        true
    }

    /// Setzt die Sperre beim Wechsel auf ein Segment anderen Typs zurück,
    /// falls der Typ die aktuelle Sperre nicht unterstützt.
    pub fn reset_for(&mut self, segment_type: SegmentType) {
        if let Some(param) = self.locked {
            if !lockable_params(segment_type).contains(&param) {
                *self = Self::default_for(segment_type);
            }
        } else if lockable_params(segment_type).is_empty() {
            *self = Self::none();
        }
    }
}

/// Wendet `param = value` unter Beachtung der Sperre auf das Segment an.
///
/// - Sperre `q_end`: Änderung anwenden, dann die Form so lösen, dass `q_end`
///   erhalten bleibt (bei `D_eff`/`k`-Änderungen wird stattdessen `end_idx`
///   verschoben)
/// - Sperre `D_eff`/`k` und Änderung von `q_end`: Form bleibt, `end_idx`
///   wandert an die Stelle, an der die Rate `value` erreicht wird
/// - Sperre `start_idx`/`end_idx` und Änderung der Dauer: die gesperrte
///   Grenze bleibt, die andere wandert
/// - sonst: Standardänderung
pub fn resolve_edit(
    segment: &Segment,
    param: SegmentParam,
    value: f64,
    lock: &LockState,
) -> Result<Edit, EditError> {
    let locked = lock
        .effective_for(segment.segment_type())
        .filter(|locked| *locked != param);

    match (locked, param) {
        (Some(SegmentParam::QEnd), SegmentParam::DEff | SegmentParam::K) => {
            let q_end = held_q_end(segment)?;
            segment
                .change(param, value)?
                .and_then(|changed| changed.solve_end_for_rate(q_end))
        }
        (Some(SegmentParam::QEnd), _) => {
            let q_end = held_q_end(segment)?;
            segment
                .change(param, value)?
                .and_then(|changed| changed.change_q_end(q_end))
        }
        (Some(SegmentParam::DEff | SegmentParam::K), SegmentParam::QEnd) => {
            segment.solve_end_for_rate(value)
        }
        (Some(SegmentParam::StartIdx), SegmentParam::Duration) => {
            segment.change_duration_keep_start(value)
        }
        (Some(SegmentParam::EndIdx), SegmentParam::Duration) => {
            segment.change_duration_keep_end(value)
        }
        _ => segment.change(param, value),
    }
}

fn held_q_end(segment: &Segment) -> Result<f64, EditError> {
    segment.q_end().ok_or(EditError::ParameterNotApplicable {
        param: SegmentParam::QEnd,
        segment_type: segment.segment_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::segment::SegmentShape;
    use approx::assert_relative_eq;

    fn arps_segment() -> Segment {
        Segment::new(
            0,
            730,
            SegmentShape::Arps {
                q_start: 100.0,
                d_eff: 0.3,
                b: 1.1,
            },
        )
        .expect("gültig")
    }

    fn lock(param: SegmentParam) -> LockState {
        let mut state = LockState::none();
        assert!(state.toggle(SegmentType::Arps, param));
        state
    }

    #[test]
    fn test_default_locks() {
        assert_eq!(
            LockState::default_for(SegmentType::Arps).locked(),
            Some(SegmentParam::EndIdx)
        );
        assert_eq!(
            LockState::default_for(SegmentType::Linear).locked(),
            Some(SegmentParam::EndIdx)
        );
        assert_eq!(LockState::default_for(SegmentType::Flat).locked(), None);
        assert_eq!(LockState::default_for(SegmentType::Empty).locked(), None);
    }

    #[test]
    fn test_toggle_keeps_single_lock() {
        let mut state = LockState::none();
        assert!(state.toggle(SegmentType::Arps, SegmentParam::QEnd));
        assert!(state.toggle(SegmentType::Arps, SegmentParam::DEff));
        assert_eq!(state.locked(), Some(SegmentParam::DEff));
        assert!(state.toggle(SegmentType::Arps, SegmentParam::DEff));
        assert_eq!(state.locked(), None, "erneutes Umschalten löst die Sperre");
    }

    #[test]
    fn test_toggle_ignores_non_lockable_param() {
        let mut state = lock(SegmentParam::DEff);
        assert!(!state.toggle(SegmentType::Arps, SegmentParam::B));
        assert!(!state.toggle(SegmentType::Flat, SegmentParam::EndIdx));
        assert_eq!(state.locked(), Some(SegmentParam::DEff));
    }

    #[test]
    fn test_reset_for_unsupported_type() {
        let mut state = lock(SegmentParam::DEff);
        state.reset_for(SegmentType::Linear);
        assert_eq!(state.locked(), Some(SegmentParam::EndIdx));

        let mut state = lock(SegmentParam::QEnd);
        state.reset_for(SegmentType::ExpDec);
        assert_eq!(state.locked(), Some(SegmentParam::QEnd), "Sperre bleibt gültig");

        state.reset_for(SegmentType::Flat);
        assert_eq!(state.locked(), None);
    }

    #[test]
    fn test_d_eff_lock_end_idx_edit_keeps_decline() {
        let segment = arps_segment();
        let edit = resolve_edit(&segment, SegmentParam::EndIdx, 1500.0, &lock(SegmentParam::DEff))
            .expect("auflösbar");
        assert_relative_eq!(edit.segment.d_eff().expect("d_eff"), 0.3, epsilon = 1e-12);
        assert_ne!(edit.segment.q_end(), segment.q_end());
        assert_eq!(edit.segment.end_idx(), 1500);
    }

    #[test]
    fn test_d_eff_lock_q_end_edit_moves_end() {
        let segment = arps_segment();
        let edit = resolve_edit(&segment, SegmentParam::QEnd, 40.0, &lock(SegmentParam::DEff))
            .expect("auflösbar");
        assert_eq!(edit.segment.d_eff(), Some(0.3));
        assert!(edit.segment.end_idx() > segment.end_idx());
        assert_relative_eq!(edit.segment.q_end().expect("q_end"), 40.0, max_relative = 1e-3);
    }

    #[test]
    fn test_q_end_lock_start_rate_edit_resolves_decline() {
        let segment = arps_segment();
        let q_end = segment.q_end().expect("q_end");
        let edit = resolve_edit(&segment, SegmentParam::QStart, 150.0, &lock(SegmentParam::QEnd))
            .expect("auflösbar");
        assert_eq!(edit.segment.q_start(), Some(150.0));
        assert_relative_eq!(edit.segment.q_end().expect("q_end"), q_end, max_relative = 1e-9);
        assert!(edit.segment.d_eff().expect("d_eff") > 0.3);
    }

    #[test]
    fn test_q_end_lock_d_eff_edit_moves_end() {
        let segment = arps_segment();
        let q_end = segment.q_end().expect("q_end");
        let edit = resolve_edit(&segment, SegmentParam::DEff, 0.5, &lock(SegmentParam::QEnd))
            .expect("auflösbar");
        assert_eq!(edit.segment.d_eff(), Some(0.5));
        assert!(edit.segment.end_idx() < segment.end_idx());
        assert_relative_eq!(edit.segment.q_end().expect("q_end"), q_end, max_relative = 1e-3);
    }

    #[test]
    fn test_start_idx_lock_duration_moves_end() {
        let segment = arps_segment();
        let edit = resolve_edit(
            &segment,
            SegmentParam::Duration,
            100.0,
            &lock(SegmentParam::StartIdx),
        )
        .expect("auflösbar");
        assert_eq!(edit.segment.start_idx(), 0);
        assert_eq!(edit.segment.end_idx(), 99);
    }

    #[test]
    fn test_end_idx_lock_duration_moves_start_also_for_flat() {
        let flat = Segment::new(0, 9, SegmentShape::Flat { q_start: 1.0 }).expect("gültig");
        // Flat ist nicht sperrbar: Standardpfad verschiebt das Ende
        let edit = resolve_edit(&flat, SegmentParam::Duration, 20.0, &LockState::none())
            .expect("auflösbar");
        assert_eq!(edit.segment.end_idx(), 19);

        let segment = arps_segment();
        let edit = resolve_edit(
            &segment,
            SegmentParam::Duration,
            31.0,
            &LockState::default_for(SegmentType::Arps),
        )
        .expect("auflösbar");
        assert_eq!(edit.segment.end_idx(), 730);
        assert_eq!(edit.segment.start_idx(), 700);
    }

    #[test]
    fn test_lock_on_edited_param_falls_back_to_default() {
        let segment = arps_segment();
        let edit = resolve_edit(&segment, SegmentParam::DEff, 0.4, &lock(SegmentParam::DEff))
            .expect("auflösbar");
        assert_eq!(edit.segment.d_eff(), Some(0.4));
        assert_eq!(edit.segment.end_idx(), 730);
    }
}
