//! "Einen Parameter ändern, Rest neu berechnen"-Operationen.
//!
//! Formparameter-, Startraten- und Indexänderungen halten die Form und leiten
//! `q_end` neu ab. Änderungen an `q_end` halten `q_start` und die Dauer und
//! lösen die Form (`k` bzw. `D_eff`) nach.

use super::{Edit, Segment, SegmentParam, SegmentShape, SegmentType};
use crate::core::decline::conversion::{
    effective_from_nominal_exp, effective_from_nominal_secant, per_year,
};
use crate::core::decline::{DeclineLaw, B_EPSILON};
use crate::core::error::{EditError, RangeWarning};
use crate::core::ranges::{calc_range, d_eff_range};

/// Bisektion für eine monoton fallende Funktion `f` auf `[lo, hi]`.
///
/// Liefert `x` mit `f(x) ≈ target`; Aufrufer stellen sicher, dass `target`
/// zwischen `f(hi)` und `f(lo)` liegt.
pub(crate) fn solve_monotone(f: impl Fn(f64) -> f64, mut lo: f64, mut hi: f64, target: f64) -> f64 {
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if f(mid) > target {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-15 * hi.abs().max(1.0) {
            break;
        }
    }
    0.5 * (lo + hi)
}

impl SegmentShape {
    fn with_q_start(self, q: f64) -> Self {
        match self {
            SegmentShape::Flat { .. } => SegmentShape::Flat { q_start: q },
            SegmentShape::Empty => SegmentShape::Empty,
            SegmentShape::Linear { k, .. } => SegmentShape::Linear { q_start: q, k },
            SegmentShape::ExpInc { d_eff, .. } => SegmentShape::ExpInc { q_start: q, d_eff },
            SegmentShape::ExpDec { d_eff, .. } => SegmentShape::ExpDec { q_start: q, d_eff },
            SegmentShape::Arps { d_eff, b, .. } => SegmentShape::Arps {
                q_start: q,
                d_eff,
                b,
            },
            SegmentShape::ArpsModified {
                d_eff,
                b,
                target_d_eff_sw,
                ..
            } => SegmentShape::ArpsModified {
                q_start: q,
                d_eff,
                b,
                target_d_eff_sw,
            },
        }
    }

    fn with_d_eff(self, value: f64) -> Self {
        match self {
            SegmentShape::ExpInc { q_start, .. } => SegmentShape::ExpInc {
                q_start,
                d_eff: value,
            },
            SegmentShape::ExpDec { q_start, .. } => SegmentShape::ExpDec {
                q_start,
                d_eff: value,
            },
            SegmentShape::Arps { q_start, b, .. } => SegmentShape::Arps {
                q_start,
                d_eff: value,
                b,
            },
            SegmentShape::ArpsModified {
                q_start,
                b,
                target_d_eff_sw,
                ..
            } => SegmentShape::ArpsModified {
                q_start,
                d_eff: value,
                b,
                target_d_eff_sw,
            },
            other => other,
        }
    }

    fn with_b(self, value: f64) -> Self {
        match self {
            SegmentShape::Arps { q_start, d_eff, .. } => SegmentShape::Arps {
                q_start,
                d_eff,
                b: value,
            },
            SegmentShape::ArpsModified {
                q_start,
                d_eff,
                target_d_eff_sw,
                ..
            } => SegmentShape::ArpsModified {
                q_start,
                d_eff,
                b: value,
                target_d_eff_sw,
            },
            other => other,
        }
    }

    fn with_k(self, value: f64) -> Self {
        match self {
            SegmentShape::Linear { q_start, .. } => SegmentShape::Linear { q_start, k: value },
            other => other,
        }
    }

    fn with_target_d_eff_sw(self, value: f64) -> Self {
        match self {
            SegmentShape::ArpsModified {
                q_start, d_eff, b, ..
            } => SegmentShape::ArpsModified {
                q_start,
                d_eff,
                b,
                target_d_eff_sw: value,
            },
            other => other,
        }
    }
}

impl Segment {
    fn not_applicable(&self, param: SegmentParam) -> EditError {
        EditError::ParameterNotApplicable {
            param,
            segment_type: self.segment_type(),
        }
    }

    fn clamp_param(
        &self,
        param: SegmentParam,
        value: f64,
    ) -> Result<(f64, Option<RangeWarning>), EditError> {
        calc_range(self, param)
            .ok_or_else(|| self.not_applicable(param))?
            .clamp(param, value)
    }

    /// Ändert einen beliebigen Parameter über die passende `change_*`-Operation.
    pub fn change(&self, param: SegmentParam, value: f64) -> Result<Edit, EditError> {
        match param {
            SegmentParam::QStart => self.change_q_start(value),
            SegmentParam::QEnd => self.change_q_end(value),
            SegmentParam::DEff => self.change_d_eff(value),
            SegmentParam::B => self.change_b(value),
            SegmentParam::K => self.change_k(value),
            SegmentParam::StartIdx => self.change_start_idx(value),
            SegmentParam::EndIdx => self.change_end_idx(value),
            SegmentParam::TargetDEffSw => self.change_target_d_eff_sw(value),
            SegmentParam::Duration => self.change_duration(value),
        }
    }

    /// Setzt `q_start`; Form und Indizes bleiben, `q_end` folgt.
    pub fn change_q_start(&self, value: f64) -> Result<Edit, EditError> {
        let (q, warning) = self.clamp_param(SegmentParam::QStart, value)?;
        let segment = self.with_shape(self.shape.with_q_start(q))?;
        Ok(Edit::new(segment).with_warning(warning))
    }

    /// Setzt `q_end`; hält `q_start` und Dauer, löst `k` bzw. `D_eff`.
    pub fn change_q_end(&self, value: f64) -> Result<Edit, EditError> {
        let (q, warning) = self.clamp_param(SegmentParam::QEnd, value)?;
        let segment_type = self.segment_type();
        if segment_type == SegmentType::Flat {
            let segment = self.with_shape(self.shape.with_q_start(q))?;
            return Ok(Edit::new(segment).with_warning(warning));
        }

        let dt = (self.end_idx - self.start_idx) as f64;
        let q0 = self.q_start().ok_or_else(|| self.not_applicable(SegmentParam::QEnd))?;
        if dt <= 0.0 {
            return Err(EditError::RateUnreachable { rate: q });
        }

        if segment_type == SegmentType::Linear {
            return Edit::new(*self)
                .with_warning(warning)
                .and_then(|seg| seg.change_k((q - q0) / dt));
        }

        // Rate am Ende fällt monoton mit D_eff: erreichbare Spanne aus den Grenzen
        let range = d_eff_range(segment_type);
        let end_rate = |d_eff: f64| self.shape.with_d_eff(d_eff).law().rate(dt);
        let q_high = end_rate(range.min);
        let q_low = end_rate(range.max);
        let (d_eff, reach_warning) = if q > q_high {
            (range.min, Some((q_high, q)))
        } else if q < q_low {
            (range.max, Some((q_low, q)))
        } else {
            (self.solve_d_eff_for_end_rate(q0, q, dt, &end_rate, range.min, range.max), None)
        };
        let reach_warning = reach_warning.map(|(bound, requested)| RangeWarning {
            param: SegmentParam::QEnd,
            requested,
            bound,
        });

        let segment = self.with_shape(self.shape.with_d_eff(d_eff.clamp(range.min, range.max)))?;
        Ok(Edit::new(segment)
            .with_warning(warning)
            .with_warning(reach_warning))
    }

    fn solve_d_eff_for_end_rate(
        &self,
        q0: f64,
        q: f64,
        dt: f64,
        end_rate: &dyn Fn(f64) -> f64,
        lo: f64,
        hi: f64,
    ) -> f64 {
        match self.shape {
            SegmentShape::ExpInc { .. } | SegmentShape::ExpDec { .. } => {
                effective_from_nominal_exp(per_year((q0 / q).ln() / dt))
            }
            SegmentShape::Arps { b, .. } if b < B_EPSILON => {
                effective_from_nominal_exp(per_year((q0 / q).ln() / dt))
            }
            SegmentShape::Arps { b, .. } => {
                let d_day = ((q0 / q).powf(b) - 1.0) / (b * dt);
                effective_from_nominal_secant(per_year(d_day), b)
            }
            _ => solve_monotone(end_rate, lo, hi, q),
        }
    }

    /// Setzt den effektiven Decline; `q_start` und Indizes bleiben.
    pub fn change_d_eff(&self, value: f64) -> Result<Edit, EditError> {
        let (d_eff, warning) = self.clamp_param(SegmentParam::DEff, value)?;
        let segment = self.with_shape(self.shape.with_d_eff(d_eff))?;
        Ok(Edit::new(segment).with_warning(warning))
    }

    /// Setzt den b-Faktor; der effektive Decline bleibt, `q_end` folgt.
    pub fn change_b(&self, value: f64) -> Result<Edit, EditError> {
        let (b, warning) = self.clamp_param(SegmentParam::B, value)?;
        let segment = self.with_shape(self.shape.with_b(b))?;
        Ok(Edit::new(segment).with_warning(warning))
    }

    /// Setzt die lineare Steigung.
    pub fn change_k(&self, value: f64) -> Result<Edit, EditError> {
        let (k, warning) = self.clamp_param(SegmentParam::K, value)?;
        let segment = self.with_shape(self.shape.with_k(k))?;
        Ok(Edit::new(segment).with_warning(warning))
    }

    /// Setzt den Umschalt-Decline von `arps_modified`.
    pub fn change_target_d_eff_sw(&self, value: f64) -> Result<Edit, EditError> {
        let (target, warning) = self.clamp_param(SegmentParam::TargetDEffSw, value)?;
        let segment = self.with_shape(self.shape.with_target_d_eff_sw(target))?;
        Ok(Edit::new(segment).with_warning(warning))
    }

    /// Verschiebt den Startindex; `q_start` gilt am neuen Start.
    pub fn change_start_idx(&self, value: f64) -> Result<Edit, EditError> {
        let (idx, warning) = self.clamp_param(SegmentParam::StartIdx, value)?;
        let segment = self.with_indices(idx.round() as i64, self.end_idx)?;
        Ok(Edit::new(segment).with_warning(warning))
    }

    /// Verschiebt den Endindex; Form bleibt, `q_end` folgt.
    pub fn change_end_idx(&self, value: f64) -> Result<Edit, EditError> {
        let (idx, warning) = self.clamp_param(SegmentParam::EndIdx, value)?;
        let segment = self.with_indices(self.start_idx, idx.round() as i64)?;
        Ok(Edit::new(segment).with_warning(warning))
    }

    /// Ändert die Dauer: `flat`/`empty` verschieben das Ende, alle anderen
    /// Typen den Start.
    pub fn change_duration(&self, value: f64) -> Result<Edit, EditError> {
        match self.segment_type() {
            SegmentType::Flat | SegmentType::Empty => self.change_duration_keep_start(value),
            _ => self.change_duration_keep_end(value),
        }
    }

    /// Dauer ändern bei festem Start (`end = start + n - 1`).
    pub fn change_duration_keep_start(&self, value: f64) -> Result<Edit, EditError> {
        let (n, warning) = self.clamp_param(SegmentParam::Duration, value)?;
        let end = self.start_idx + n.round() as i64 - 1;
        Edit::new(*self)
            .with_warning(warning)
            .and_then(|seg| seg.change_end_idx(end as f64))
    }

    /// Dauer ändern bei festem Ende (`start = end - n + 1`).
    pub fn change_duration_keep_end(&self, value: f64) -> Result<Edit, EditError> {
        let (n, warning) = self.clamp_param(SegmentParam::Duration, value)?;
        let start = self.end_idx - n.round() as i64 + 1;
        Edit::new(*self)
            .with_warning(warning)
            .and_then(|seg| seg.change_start_idx(start as f64))
    }

    /// Skaliert bzw. verschiebt `q_start` so, dass `q_end` den Wert annimmt;
    /// Formparameter bleiben unverändert.
    pub fn translate_to_q_end(&self, value: f64) -> Result<Edit, EditError> {
        let q0 = self
            .q_start()
            .ok_or_else(|| self.not_applicable(SegmentParam::QEnd))?;
        let q_start = match self.shape {
            SegmentShape::Flat { .. } => value,
            SegmentShape::Linear { k, .. } => value - k * (self.end_idx - self.start_idx) as f64,
            _ => {
                let q_end = self.rate_at(self.end_idx);
                if q_end <= 0.0 || !q_end.is_finite() {
                    return Err(EditError::RateUnreachable { rate: value });
                }
                q0 * value / q_end
            }
        };
        self.change_q_start(q_start)
    }

    /// Verschiebt `end_idx` dorthin, wo das unveränderte Gesetz die Rate `q` erreicht.
    pub fn solve_end_for_rate(&self, q: f64) -> Result<Edit, EditError> {
        if !q.is_finite() {
            return Err(EditError::NotFinite {
                param: SegmentParam::QEnd,
                value: q,
            });
        }
        let dt = self
            .law()
            .time_to_rate(q)
            .ok_or(EditError::RateUnreachable { rate: q })?;
        self.change_end_idx(self.start_idx as f64 + dt.round())
    }

    /// Stellt die Anfangssteigung (Rate pro Tag) bei festem `q_start` ein.
    ///
    /// `linear` übernimmt die Steigung als `k`; Decline-Typen lösen den
    /// nominalen Anfangs-Decline `D = -s / q_start` bei festem `b`.
    pub fn change_initial_slope(&self, slope: f64) -> Result<Edit, EditError> {
        match self.shape {
            SegmentShape::Linear { .. } => self.change_k(slope),
            SegmentShape::ExpDec { q_start, .. }
            | SegmentShape::Arps { q_start, .. }
            | SegmentShape::ArpsModified { q_start, .. } => {
                if slope >= 0.0 {
                    return Err(EditError::NonDecliningSlope { slope });
                }
                let d_year = per_year(-slope / q_start);
                let d_eff = match self.shape.b() {
                    Some(b) => effective_from_nominal_secant(d_year, b),
                    None => effective_from_nominal_exp(d_year),
                };
                self.change_d_eff(d_eff)
            }
            _ => Err(EditError::SlopeNotMatchable(self.segment_type())),
        }
    }
}
