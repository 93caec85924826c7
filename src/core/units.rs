//! Umrechnung zwischen Rechen-Einheiten und Anzeige-Einheiten.
//!
//! Rechen-Einheiten: Rate pro Tag, effektiver Decline als Bruch, Indizes als
//! ganze Tage seit Epoche (bzw. relative Offsets im Typkurven-Modus).
//! Anzeige-Einheiten: konfigurierbare Raten-Basis, Decline in Prozent,
//! Indizes als Kalenderdatum.

use super::decline::DAYS_PER_YEAR;
use super::error::{EditError, RangeWarning};
use super::ranges::{calc_range, CalcRange};
use super::segment::{Segment, SegmentParam, SegmentType};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Tage pro Monat (Jahresmittel).
pub const DAYS_PER_MONTH: f64 = DAYS_PER_YEAR / 12.0;

/// Bidirektionale Abbildung Rechenwert ↔ Anzeigewert.
pub trait UnitConversion {
    fn to_view(&self, calc: f64) -> f64;
    fn to_calc(&self, view: f64) -> f64;
    fn label(&self) -> &'static str;
}

/// Lineare Einheit `view = calc · factor` (factor > 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearUnit {
    pub label: &'static str,
    pub factor: f64,
}

impl LinearUnit {
    pub const IDENTITY: LinearUnit = LinearUnit {
        label: "",
        factor: 1.0,
    };
    pub const PERCENT: LinearUnit = LinearUnit {
        label: "%",
        factor: 100.0,
    };
}

impl UnitConversion for LinearUnit {
    fn to_view(&self, calc: f64) -> f64 {
        calc * self.factor
    }

    fn to_calc(&self, view: f64) -> f64 {
        view / self.factor
    }

    fn label(&self) -> &'static str {
        self.label
    }
}

/// Zeitbasis der angezeigten Raten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    #[default]
    Day,
    Month,
    Year,
}

impl RateBasis {
    pub fn unit(self) -> LinearUnit {
        match self {
            RateBasis::Day => LinearUnit {
                label: "/d",
                factor: 1.0,
            },
            RateBasis::Month => LinearUnit {
                label: "/mo",
                factor: DAYS_PER_MONTH,
            },
            RateBasis::Year => LinearUnit {
                label: "/a",
                factor: DAYS_PER_YEAR,
            },
        }
    }
}

/// Zuordnung Index ↔ Kalenderdatum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainAxis {
    /// `true` = Indizes sind relative Offsets ohne Datum.
    pub relative_time: bool,
    /// Datum des Index 0.
    pub epoch: NaiveDate,
}

impl DomainAxis {
    /// Standard-Epoche 1900-01-01.
    pub fn default_epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn new(relative_time: bool, epoch: NaiveDate) -> Self {
        Self {
            relative_time,
            epoch,
        }
    }

    pub fn relative() -> Self {
        Self::new(true, Self::default_epoch())
    }

    pub fn dated() -> Self {
        Self::new(false, Self::default_epoch())
    }

    pub fn idx_from_date(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.epoch).num_days()
    }

    pub fn date_from_idx(&self, idx: i64) -> Option<NaiveDate> {
        TimeDelta::try_days(idx).and_then(|delta| self.epoch.checked_add_signed(delta))
    }
}

/// Anzeigewert eines Parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewValue {
    Number(f64),
    Date(NaiveDate),
}

/// Einheitensystem einer Sitzung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSystem {
    pub rate: RateBasis,
    pub axis: DomainAxis,
}

impl UnitSystem {
    pub fn new(rate: RateBasis, axis: DomainAxis) -> Self {
        Self { rate, axis }
    }

    /// Einheit eines numerischen Parameters.
    pub fn unit_for(&self, param: SegmentParam) -> LinearUnit {
        match param {
            SegmentParam::QStart | SegmentParam::QEnd | SegmentParam::K => self.rate.unit(),
            SegmentParam::DEff | SegmentParam::TargetDEffSw => LinearUnit::PERCENT,
            SegmentParam::B
            | SegmentParam::StartIdx
            | SegmentParam::EndIdx
            | SegmentParam::Duration => LinearUnit::IDENTITY,
        }
    }

    /// Rechenwert → Anzeigewert.
    pub fn param_to_view(&self, param: SegmentParam, calc: f64) -> ViewValue {
        if param.is_index() && !self.axis.relative_time {
            if let Some(date) = self.axis.date_from_idx(calc.round() as i64) {
                return ViewValue::Date(date);
            }
        }
        ViewValue::Number(self.unit_for(param).to_view(calc))
    }

    /// Zulässiger Bereich eines Parameters in Anzeige-Einheiten.
    pub fn view_range(&self, segment: &Segment, param: SegmentParam) -> Option<CalcRange> {
        let range = calc_range(segment, param)?;
        let unit = self.unit_for(param);
        Some(CalcRange::new(unit.to_view(range.min), unit.to_view(range.max)))
    }

    /// Anzeigewert → Rechenwert; klemmt zuerst auf den Anzeige-Bereich.
    pub fn param_to_calc(
        &self,
        segment: &Segment,
        param: SegmentParam,
        value: ViewValue,
    ) -> Result<(f64, Option<RangeWarning>), EditError> {
        let number = match value {
            ViewValue::Number(number) => number,
            ViewValue::Date(_) if self.axis.relative_time => {
                return Err(EditError::DateInRelativeMode(param));
            }
            ViewValue::Date(_) if !param.is_index() => {
                return Err(EditError::ParameterNotApplicable {
                    param,
                    segment_type: segment.segment_type(),
                });
            }
            ViewValue::Date(date) => self.axis.idx_from_date(date) as f64,
        };

        let range = self
            .view_range(segment, param)
            .ok_or(EditError::ParameterNotApplicable {
                param,
                segment_type: segment.segment_type(),
            })?;
        let (clamped, warning) = range.clamp(param, number)?;
        Ok((self.unit_for(param).to_calc(clamped), warning))
    }

    /// Anzeige-Projektion eines Segments.
    pub fn segment_view(&self, segment: &Segment) -> SegmentView {
        let number = |param: SegmentParam, value: Option<f64>| {
            value.map(|v| self.unit_for(param).to_view(v))
        };
        SegmentView {
            segment_type: segment.segment_type(),
            start: self.param_to_view(SegmentParam::StartIdx, segment.start_idx() as f64),
            end: self.param_to_view(SegmentParam::EndIdx, segment.end_idx() as f64),
            duration: segment.duration(),
            q_start: number(SegmentParam::QStart, segment.q_start()),
            q_end: number(SegmentParam::QEnd, segment.q_end()),
            d_eff: number(SegmentParam::DEff, segment.d_eff()),
            b: segment.b(),
            k: number(SegmentParam::K, segment.k()),
            target_d_eff_sw: number(SegmentParam::TargetDEffSw, segment.target_d_eff_sw()),
            switch: segment
                .sw_idx()
                .map(|idx| self.param_to_view(SegmentParam::StartIdx, idx as f64)),
            rate_label: self.rate.unit().label,
        }
    }
}

/// Segment in Anzeige-Einheiten (nur lesend).
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentView {
    pub segment_type: SegmentType,
    pub start: ViewValue,
    pub end: ViewValue,
    pub duration: i64,
    pub q_start: Option<f64>,
    pub q_end: Option<f64>,
    pub d_eff: Option<f64>,
    pub b: Option<f64>,
    pub k: Option<f64>,
    pub target_d_eff_sw: Option<f64>,
    pub switch: Option<ViewValue>,
    pub rate_label: &'static str,
}
