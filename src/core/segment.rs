//! Segment: typisiertes Kurvenstück über einem ganzzahligen Indexbereich.
//!
//! Ein Segment ist ein unveränderlicher Wert. Jede Änderung liefert über die
//! `change_*`-Operationen ein neues Segment (siehe `change.rs`).

use super::decline::conversion::{
    nominal_from_effective_exp, nominal_from_effective_secant, per_day,
};
use super::decline::{Arps, DeclineLaw, Exponential, Flat, Law, Linear, ModifiedArps, ZeroRate};
use super::error::{EditError, RangeWarning};
use serde::{Deserialize, Serialize};
use std::fmt;

mod change;

/// Segmenttyp (bestimmt Ratengesetz und Parametersatz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    Flat,
    Empty,
    Linear,
    ExpInc,
    ExpDec,
    Arps,
    ArpsModified,
}

impl SegmentType {
    /// Alle Segmenttypen in Anzeige-Reihenfolge.
    pub const ALL: [SegmentType; 7] = [
        SegmentType::Flat,
        SegmentType::Empty,
        SegmentType::Linear,
        SegmentType::ExpInc,
        SegmentType::ExpDec,
        SegmentType::Arps,
        SegmentType::ArpsModified,
    ];

    /// Persistenz-Name des Typs.
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentType::Flat => "flat",
            SegmentType::Empty => "empty",
            SegmentType::Linear => "linear",
            SegmentType::ExpInc => "exp_inc",
            SegmentType::ExpDec => "exp_dec",
            SegmentType::Arps => "arps",
            SegmentType::ArpsModified => "arps_modified",
        }
    }

    /// Editierbare Parameter dieses Typs (ohne abgeleitete Werte wie `q_end`).
    pub fn params(self) -> &'static [SegmentParam] {
        use SegmentParam::*;
        match self {
            SegmentType::Flat => &[QStart, QEnd, StartIdx, EndIdx, Duration],
            SegmentType::Empty => &[StartIdx, EndIdx, Duration],
            SegmentType::Linear => &[QStart, QEnd, K, StartIdx, EndIdx, Duration],
            SegmentType::ExpInc | SegmentType::ExpDec => {
                &[QStart, QEnd, DEff, StartIdx, EndIdx, Duration]
            }
            SegmentType::Arps => &[QStart, QEnd, DEff, B, StartIdx, EndIdx, Duration],
            SegmentType::ArpsModified => &[
                QStart,
                QEnd,
                DEff,
                B,
                TargetDEffSw,
                StartIdx,
                EndIdx,
                Duration,
            ],
        }
    }

    /// Prüft ob der Typ den Parameter besitzt.
    pub fn has_param(self, param: SegmentParam) -> bool {
        self.params().contains(&param)
    }

    /// Typen mit exponentiellem oder hyperbolischem Decline.
    pub fn is_decline(self) -> bool {
        matches!(
            self,
            SegmentType::ExpDec | SegmentType::Arps | SegmentType::ArpsModified
        )
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name eines editierbaren Segmentparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentParam {
    QStart,
    QEnd,
    DEff,
    B,
    K,
    StartIdx,
    EndIdx,
    TargetDEffSw,
    Duration,
}

impl SegmentParam {
    /// Indexartige Parameter (Datum bzw. Offset in der Ansicht).
    pub fn is_index(self) -> bool {
        matches!(self, SegmentParam::StartIdx | SegmentParam::EndIdx)
    }
}

impl fmt::Display for SegmentParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentParam::QStart => "q_start",
            SegmentParam::QEnd => "q_end",
            SegmentParam::DEff => "D_eff",
            SegmentParam::B => "b",
            SegmentParam::K => "k",
            SegmentParam::StartIdx => "start_idx",
            SegmentParam::EndIdx => "end_idx",
            SegmentParam::TargetDEffSw => "target_D_eff_sw",
            SegmentParam::Duration => "duration",
        })
    }
}

/// Typabhängiger Parametersatz in Rechen-Einheiten.
///
/// `d_eff` ist der effektive Jahres-Decline als Bruch, `k` die Steigung in
/// Rate pro Tag. Nicht definierte Parameter sind nicht darstellbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentShape {
    Flat {
        q_start: f64,
    },
    Empty,
    Linear {
        q_start: f64,
        k: f64,
    },
    ExpInc {
        q_start: f64,
        d_eff: f64,
    },
    ExpDec {
        q_start: f64,
        d_eff: f64,
    },
    Arps {
        q_start: f64,
        d_eff: f64,
        b: f64,
    },
    ArpsModified {
        q_start: f64,
        d_eff: f64,
        b: f64,
        target_d_eff_sw: f64,
    },
}

impl SegmentShape {
    pub fn segment_type(&self) -> SegmentType {
        match self {
            SegmentShape::Flat { .. } => SegmentType::Flat,
            SegmentShape::Empty => SegmentType::Empty,
            SegmentShape::Linear { .. } => SegmentType::Linear,
            SegmentShape::ExpInc { .. } => SegmentType::ExpInc,
            SegmentShape::ExpDec { .. } => SegmentType::ExpDec,
            SegmentShape::Arps { .. } => SegmentType::Arps,
            SegmentShape::ArpsModified { .. } => SegmentType::ArpsModified,
        }
    }

    /// Ratengesetz des Parametersatzes.
    pub fn law(&self) -> Law {
        match *self {
            SegmentShape::Flat { q_start } => Law::Flat(Flat { q: q_start }),
            SegmentShape::Empty => Law::Zero(ZeroRate),
            SegmentShape::Linear { q_start, k } => Law::Linear(Linear { q0: q_start, k }),
            SegmentShape::ExpInc { q_start, d_eff } | SegmentShape::ExpDec { q_start, d_eff } => {
                Law::Exponential(Exponential {
                    q0: q_start,
                    d: per_day(nominal_from_effective_exp(d_eff)),
                })
            }
            SegmentShape::Arps { q_start, d_eff, b } => Law::Arps(Arps {
                q0: q_start,
                d: per_day(nominal_from_effective_secant(d_eff, b)),
                b,
            }),
            SegmentShape::ArpsModified {
                q_start,
                d_eff,
                b,
                target_d_eff_sw,
            } => Law::ModifiedArps(ModifiedArps {
                q0: q_start,
                d_i: per_day(nominal_from_effective_secant(d_eff, b)),
                b,
                d_sw: per_day(nominal_from_effective_exp(target_d_eff_sw)),
            }),
        }
    }

    fn values(&self) -> [(SegmentParam, Option<f64>); 5] {
        [
            (SegmentParam::QStart, self.q_start()),
            (SegmentParam::K, self.k()),
            (SegmentParam::DEff, self.d_eff()),
            (SegmentParam::B, self.b()),
            (SegmentParam::TargetDEffSw, self.target_d_eff_sw()),
        ]
    }

    pub fn q_start(&self) -> Option<f64> {
        match *self {
            SegmentShape::Empty => None,
            SegmentShape::Flat { q_start }
            | SegmentShape::Linear { q_start, .. }
            | SegmentShape::ExpInc { q_start, .. }
            | SegmentShape::ExpDec { q_start, .. }
            | SegmentShape::Arps { q_start, .. }
            | SegmentShape::ArpsModified { q_start, .. } => Some(q_start),
        }
    }

    pub fn d_eff(&self) -> Option<f64> {
        match *self {
            SegmentShape::ExpInc { d_eff, .. }
            | SegmentShape::ExpDec { d_eff, .. }
            | SegmentShape::Arps { d_eff, .. }
            | SegmentShape::ArpsModified { d_eff, .. } => Some(d_eff),
            _ => None,
        }
    }

    pub fn b(&self) -> Option<f64> {
        match *self {
            SegmentShape::Arps { b, .. } | SegmentShape::ArpsModified { b, .. } => Some(b),
            _ => None,
        }
    }

    pub fn k(&self) -> Option<f64> {
        match *self {
            SegmentShape::Linear { k, .. } => Some(k),
            _ => None,
        }
    }

    pub fn target_d_eff_sw(&self) -> Option<f64> {
        match *self {
            SegmentShape::ArpsModified {
                target_d_eff_sw, ..
            } => Some(target_d_eff_sw),
            _ => None,
        }
    }
}

/// Startwerte für neu eingefügte Segmente.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDefaults {
    pub duration: i64,
    pub q_start: f64,
    pub d_eff: f64,
    pub d_eff_inc: f64,
    pub b: f64,
    pub k: f64,
    pub target_d_eff_sw: f64,
}

impl Default for SegmentDefaults {
    fn default() -> Self {
        Self {
            duration: 365,
            q_start: 100.0,
            d_eff: 0.3,
            d_eff_inc: -0.1,
            b: 1.0,
            k: 0.0,
            target_d_eff_sw: 0.06,
        }
    }
}

impl SegmentDefaults {
    /// Standard-Parametersatz eines Typs mit gegebener Startrate.
    pub fn shape(&self, segment_type: SegmentType, q_start: f64) -> SegmentShape {
        match segment_type {
            SegmentType::Flat => SegmentShape::Flat { q_start },
            SegmentType::Empty => SegmentShape::Empty,
            SegmentType::Linear => SegmentShape::Linear { q_start, k: self.k },
            SegmentType::ExpInc => SegmentShape::ExpInc {
                q_start,
                d_eff: self.d_eff_inc,
            },
            SegmentType::ExpDec => SegmentShape::ExpDec {
                q_start,
                d_eff: self.d_eff,
            },
            SegmentType::Arps => SegmentShape::Arps {
                q_start,
                d_eff: self.d_eff,
                b: self.b,
            },
            SegmentType::ArpsModified => SegmentShape::ArpsModified {
                q_start,
                d_eff: self.d_eff,
                b: self.b,
                target_d_eff_sw: self.target_d_eff_sw,
            },
        }
    }
}

/// Unveränderliches Kurvenstück `[start_idx, end_idx]` (inklusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start_idx: i64,
    end_idx: i64,
    shape: SegmentShape,
}

impl Segment {
    /// Erstellt ein Segment; prüft Indexreihenfolge und endliche Parameter.
    pub fn new(start_idx: i64, end_idx: i64, shape: SegmentShape) -> Result<Self, EditError> {
        if start_idx > end_idx {
            return Err(EditError::InvertedRange {
                start: start_idx,
                end: end_idx,
            });
        }
        for (param, value) in shape.values() {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(EditError::NotFinite { param, value });
            }
        }
        Ok(Self {
            start_idx,
            end_idx,
            shape,
        })
    }

    pub fn segment_type(&self) -> SegmentType {
        self.shape.segment_type()
    }

    pub fn shape(&self) -> &SegmentShape {
        &self.shape
    }

    pub fn start_idx(&self) -> i64 {
        self.start_idx
    }

    pub fn end_idx(&self) -> i64 {
        self.end_idx
    }

    /// Anzahl Tage im Segment (inklusive beider Grenzen).
    pub fn duration(&self) -> i64 {
        self.end_idx - self.start_idx + 1
    }

    /// Prüft ob der Index im Segment liegt.
    pub fn contains(&self, idx: i64) -> bool {
        (self.start_idx..=self.end_idx).contains(&idx)
    }

    pub fn q_start(&self) -> Option<f64> {
        self.shape.q_start()
    }

    /// Abgeleitete Rate am Endindex.
    pub fn q_end(&self) -> Option<f64> {
        self.shape.q_start().map(|_| self.rate_at(self.end_idx))
    }

    pub fn d_eff(&self) -> Option<f64> {
        self.shape.d_eff()
    }

    pub fn b(&self) -> Option<f64> {
        self.shape.b()
    }

    pub fn k(&self) -> Option<f64> {
        self.shape.k()
    }

    pub fn target_d_eff_sw(&self) -> Option<f64> {
        self.shape.target_d_eff_sw()
    }

    /// Abgeleiteter Umschaltindex (nur `arps_modified` mit hyperbolischer Phase).
    pub fn sw_idx(&self) -> Option<i64> {
        match self.shape.law() {
            Law::ModifiedArps(law) => law
                .switch_time()
                .map(|t| self.start_idx.saturating_add(t.round() as i64)),
            _ => None,
        }
    }

    /// Aktueller Wert eines Parameters in Rechen-Einheiten.
    pub fn param(&self, param: SegmentParam) -> Option<f64> {
        match param {
            SegmentParam::QStart => self.q_start(),
            SegmentParam::QEnd => self.q_end(),
            SegmentParam::DEff => self.d_eff(),
            SegmentParam::B => self.b(),
            SegmentParam::K => self.k(),
            SegmentParam::TargetDEffSw => self.target_d_eff_sw(),
            SegmentParam::StartIdx => Some(self.start_idx as f64),
            SegmentParam::EndIdx => Some(self.end_idx as f64),
            SegmentParam::Duration => Some(self.duration() as f64),
        }
    }

    pub fn law(&self) -> Law {
        self.shape.law()
    }

    /// Rate am Index `idx` (auch außerhalb des Bereichs extrapoliert).
    pub fn rate_at(&self, idx: i64) -> f64 {
        self.law().rate((idx - self.start_idx) as f64)
    }

    /// Erste Ableitung der Rate am Index `idx`.
    pub fn derivative_at(&self, idx: i64) -> f64 {
        self.law().derivative((idx - self.start_idx) as f64)
    }

    /// Kumuliertes Volumen über die gesamte Segmentdauer.
    pub fn volume(&self) -> f64 {
        self.law().volume(self.duration() as f64)
    }

    /// Verschiebt das Segment um `offset` Tage (Form bleibt erhalten).
    pub fn shifted(&self, offset: i64) -> Self {
        Self {
            start_idx: self.start_idx + offset,
            end_idx: self.end_idx + offset,
            shape: self.shape,
        }
    }

    fn with_shape(&self, shape: SegmentShape) -> Result<Self, EditError> {
        Self::new(self.start_idx, self.end_idx, shape)
    }

    fn with_indices(&self, start_idx: i64, end_idx: i64) -> Result<Self, EditError> {
        Self::new(start_idx, end_idx, self.shape)
    }
}

/// Ergebnis einer Segmentänderung: neues Segment plus Bereichswarnungen.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub segment: Segment,
    pub warnings: Vec<RangeWarning>,
}

impl Edit {
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            warnings: Vec::new(),
        }
    }

    fn with_warning(mut self, warning: Option<RangeWarning>) -> Self {
        self.warnings.extend(warning);
        self
    }

    /// Wendet eine Folgeänderung auf das Ergebnis an und sammelt die Warnungen.
    pub fn and_then(
        self,
        next: impl FnOnce(&Segment) -> Result<Edit, EditError>,
    ) -> Result<Edit, EditError> {
        let mut follow = next(&self.segment)?;
        let mut warnings = self.warnings;
        warnings.append(&mut follow.warnings);
        Ok(Edit {
            segment: follow.segment,
            warnings,
        })
    }
}
