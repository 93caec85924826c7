//! Zulässige Wertebereiche je Parameter in Rechen-Einheiten.
//!
//! Werte außerhalb des Bereichs werden auf die Grenze geklemmt und als
//! [`RangeWarning`] gemeldet; nicht-endliche Werte werden abgewiesen.

use super::error::{EditError, RangeWarning};
use super::segment::{Segment, SegmentParam, SegmentType};

// ── Raten ───────────────────────────────────────────────────────────

/// Minimale Rate (Rechen-Einheit pro Tag).
pub const Q_MIN: f64 = 1e-3;
/// Maximale Rate (Rechen-Einheit pro Tag).
pub const Q_MAX: f64 = 1e7;

// ── Decline ─────────────────────────────────────────────────────────

/// Effektiver Jahres-Decline fallender Typen.
pub const D_EFF_MIN: f64 = 0.001;
pub const D_EFF_MAX: f64 = 0.99;
/// Effektiver Jahres-Decline von `exp_inc` (negativ = Anstieg).
pub const D_EFF_INC_MIN: f64 = -10.0;
pub const D_EFF_INC_MAX: f64 = -0.001;
/// Umschalt-Decline von `arps_modified`.
pub const D_SW_MIN: f64 = 0.001;
pub const D_SW_MAX: f64 = 0.99;

pub const B_MIN: f64 = 0.0;
pub const B_MAX: f64 = 10.0;

/// Lineare Steigung (Rate pro Tag).
pub const K_MIN: f64 = -1e6;
pub const K_MAX: f64 = 1e6;

// ── Indizes ─────────────────────────────────────────────────────────

pub const IDX_MIN: i64 = -100_000;
pub const IDX_MAX: i64 = 200_000;
pub const DURATION_MIN: i64 = 1;
pub const DURATION_MAX: i64 = 100_000;

/// Relative Toleranz, innerhalb der an der Grenze still geklemmt wird.
const BOUND_TOLERANCE: f64 = 1e-9;

/// Geschlossenes Intervall `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalcRange {
    pub min: f64,
    pub max: f64,
}

impl CalcRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Klemmt `value` in den Bereich.
    pub fn clamp(
        &self,
        param: SegmentParam,
        value: f64,
    ) -> Result<(f64, Option<RangeWarning>), EditError> {
        if !value.is_finite() {
            return Err(EditError::NotFinite { param, value });
        }
        let bound = if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            return Ok((value, None));
        };
        let warning = ((value - bound).abs() > BOUND_TOLERANCE * bound.abs().max(1.0)).then_some(
            RangeWarning {
                param,
                requested: value,
                bound,
            },
        );
        Ok((bound, warning))
    }
}

/// Bereich des effektiven Declines für einen Typ.
pub fn d_eff_range(segment_type: SegmentType) -> CalcRange {
    match segment_type {
        SegmentType::ExpInc => CalcRange::new(D_EFF_INC_MIN, D_EFF_INC_MAX),
        _ => CalcRange::new(D_EFF_MIN, D_EFF_MAX),
    }
}

/// Bereich eines Parameters für das gegebene Segment.
///
/// Indexgrenzen hängen vom Segment selbst ab (`start_idx ≤ end_idx`).
/// `None`, wenn der Typ den Parameter nicht besitzt.
pub fn calc_range(segment: &Segment, param: SegmentParam) -> Option<CalcRange> {
    let segment_type = segment.segment_type();
    if !segment_type.has_param(param) {
        return None;
    }
    Some(match param {
        SegmentParam::QStart | SegmentParam::QEnd => CalcRange::new(Q_MIN, Q_MAX),
        SegmentParam::DEff => d_eff_range(segment_type),
        SegmentParam::B => CalcRange::new(B_MIN, B_MAX),
        SegmentParam::K => CalcRange::new(K_MIN, K_MAX),
        SegmentParam::TargetDEffSw => CalcRange::new(D_SW_MIN, D_SW_MAX),
        SegmentParam::StartIdx => CalcRange::new(IDX_MIN as f64, segment.end_idx() as f64),
        SegmentParam::EndIdx => CalcRange::new(segment.start_idx() as f64, IDX_MAX as f64),
        SegmentParam::Duration => CalcRange::new(DURATION_MIN as f64, DURATION_MAX as f64),
    })
}

/// Prüft die frei wählbaren Parameter eines Segments gegen ihre Bereiche.
///
/// Abgeleitete Werte (`q_end`, Dauer) bleiben ungeprüft. Anders als beim
/// Editieren wird nicht geklemmt, sondern abgewiesen.
pub fn validate_ranges(segment: &Segment) -> Result<(), EditError> {
    let checked = segment
        .segment_type()
        .params()
        .iter()
        .filter(|param| !matches!(param, SegmentParam::QEnd | SegmentParam::Duration));
    for &param in checked {
        let (Some(range), Some(value)) = (calc_range(segment, param), segment.param(param)) else {
            continue;
        };
        if !range.contains(value) {
            return Err(EditError::OutOfRange {
                param,
                value,
                min: range.min,
                max: range.max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::segment::SegmentShape;

    #[test]
    fn test_clamp_inside_range_has_no_warning() {
        let range = CalcRange::new(0.0, 10.0);
        let (value, warning) = range.clamp(SegmentParam::B, 2.5).expect("endlich");
        assert_eq!(value, 2.5);
        assert!(warning.is_none());
    }

    #[test]
    fn test_clamp_reports_enforced_bound() {
        let range = CalcRange::new(D_EFF_MIN, D_EFF_MAX);
        let (value, warning) = range.clamp(SegmentParam::DEff, 1.5).expect("endlich");
        assert_eq!(value, D_EFF_MAX);
        let warning = warning.expect("Warnung erwartet");
        assert_eq!(warning.bound, D_EFF_MAX);
        assert_eq!(warning.requested, 1.5);
    }

    #[test]
    fn test_clamp_rejects_nan() {
        let range = CalcRange::new(0.0, 1.0);
        assert!(matches!(
            range.clamp(SegmentParam::QStart, f64::NAN),
            Err(EditError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_clamp_tolerates_rounding_at_bound() {
        let range = CalcRange::new(0.0, 0.99);
        let (value, warning) = range
            .clamp(SegmentParam::DEff, 0.99 + 1e-15)
            .expect("endlich");
        assert_eq!(value, 0.99);
        assert!(warning.is_none(), "Rundungsrauschen ohne Warnung");
    }

    #[test]
    fn test_index_ranges_depend_on_segment() {
        let segment = Segment::new(10, 50, SegmentShape::Flat { q_start: 5.0 }).expect("gültig");
        let start = calc_range(&segment, SegmentParam::StartIdx).expect("Index-Bereich");
        assert_eq!(start.max, 50.0);
        let end = calc_range(&segment, SegmentParam::EndIdx).expect("Index-Bereich");
        assert_eq!(end.min, 10.0);
        assert!(calc_range(&segment, SegmentParam::B).is_none());
    }

    #[test]
    fn test_validate_ranges_accepts_bounds_and_rejects_beyond() {
        let at_bounds = Segment::new(
            IDX_MIN,
            IDX_MAX,
            SegmentShape::Arps {
                q_start: Q_MAX,
                d_eff: D_EFF_MIN,
                b: B_MAX,
            },
        )
        .expect("gültig");
        assert!(validate_ranges(&at_bounds).is_ok());

        let steep = Segment::new(0, 100, SegmentShape::ExpDec { q_start: 100.0, d_eff: 1.5 })
            .expect("endlich");
        assert!(matches!(
            validate_ranges(&steep),
            Err(EditError::OutOfRange {
                param: SegmentParam::DEff,
                ..
            })
        ));

        let growing = Segment::new(0, 100, SegmentShape::ExpInc { q_start: 100.0, d_eff: 0.2 })
            .expect("endlich");
        assert!(validate_ranges(&growing).is_err(), "exp_inc braucht negativen Decline");

        let late = Segment::new(0, IDX_MAX + 1, SegmentShape::Empty).expect("endlich");
        assert!(matches!(
            validate_ranges(&late),
            Err(EditError::OutOfRange {
                param: SegmentParam::EndIdx,
                ..
            })
        ));
    }

    #[test]
    fn test_exp_inc_has_negative_decline_range() {
        let range = d_eff_range(SegmentType::ExpInc);
        assert!(range.max < 0.0);
        assert!(d_eff_range(SegmentType::Arps).min > 0.0);
    }
}
