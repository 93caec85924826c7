//! Terminierung des letzten Segments über q-final und Lebensdauer.
//!
//! Das Ende des letzten Segments wird auf den früheren der beiden Indizes
//! gesetzt: Erreichen der Grenzrate `q_final` oder Ende der Lebensdauer.

use super::chain::{EndCriterion, SegmentChain};
use super::decline::{DeclineLaw, DAYS_PER_YEAR};
use super::error::{EditError, RangeWarning};
use super::ranges::IDX_MAX;
use super::segment::{Edit, Segment};
use super::units::{DomainAxis, DAYS_PER_MONTH};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Einheit einer Lebensdauer-Angabe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeUnit {
    Years,
    Months,
    Days,
}

impl LifeUnit {
    fn approx_days(self) -> f64 {
        match self {
            LifeUnit::Years => DAYS_PER_YEAR,
            LifeUnit::Months => DAYS_PER_MONTH,
            LifeUnit::Days => 1.0,
        }
    }

    /// Kalenderaddition `date + num · unit`.
    fn add_to(self, date: NaiveDate, num: u32) -> Option<NaiveDate> {
        match self {
            LifeUnit::Years => date.checked_add_months(Months::new(num.checked_mul(12)?)),
            LifeUnit::Months => date.checked_add_months(Months::new(num)),
            LifeUnit::Days => date.checked_add_days(Days::new(u64::from(num))),
        }
    }
}

/// Regel für die Lebensdauer der Prognose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WellLifeMethod {
    /// Prognose endet an festem Datum
    FixedDate { date: NaiveDate },
    /// Lebensdauer ab Beginn des ersten Segments
    DurationFromFirstData { num: u32, unit: LifeUnit },
    /// Lebensdauer ab Stichtag
    DurationFromToday {
        num: u32,
        unit: LifeUnit,
        today: NaiveDate,
    },
}

/// Terminierungs-Eingabe einer Phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QFinalDict {
    pub q_final: f64,
    pub well_life: WellLifeMethod,
}

/// Index, an dem das Gesetz des Segments `q_final` erreicht.
///
/// `None`, wenn die Rate nie erreicht wird (z. B. Anstieg oder konstant
/// oberhalb); liegt die Rate bereits am Start darunter, gilt der Start.
fn rate_bound(last: &Segment, q_final: f64) -> Option<i64> {
    let q_start = last.q_start()?;
    match last.law().time_to_rate(q_final) {
        // Stark hyperbolische Verläufe liefern astronomische Zeiten
        Some(dt) => Some((last.start_idx() as f64 + dt.round()).min(IDX_MAX as f64) as i64),
        None if q_start <= q_final => Some(last.start_idx()),
        None => None,
    }
}

/// Letzter Index innerhalb der Lebensdauer.
fn life_bound(
    first: &Segment,
    method: &WellLifeMethod,
    axis: &DomainAxis,
) -> Result<i64, EditError> {
    match *method {
        WellLifeMethod::DurationFromFirstData { num, unit } => {
            if axis.relative_time {
                let days = (f64::from(num) * unit.approx_days()).round() as i64;
                return Ok(first.start_idx() + days - 1);
            }
            let start = axis
                .date_from_idx(first.start_idx())
                .ok_or(EditError::DateOutOfRange)?;
            let end = unit.add_to(start, num).ok_or(EditError::DateOutOfRange)?;
            Ok(axis.idx_from_date(end) - 1)
        }
        _ if axis.relative_time => Err(EditError::WellLifeNotApplicable),
        WellLifeMethod::FixedDate { date } => Ok(axis.idx_from_date(date)),
        WellLifeMethod::DurationFromToday { num, unit, today } => {
            let end = unit.add_to(today, num).ok_or(EditError::DateOutOfRange)?;
            Ok(axis.idx_from_date(end) - 1)
        }
    }
}

/// Berechnet das terminierte letzte Segment.
///
/// Das Ende wird nie vor `start_idx` gelegt; ein früherer Zielindex wird mit
/// Warnung auf den Start geklemmt.
pub fn apply_termination(
    last: &Segment,
    first: &Segment,
    input: Option<&QFinalDict>,
    axis: &DomainAxis,
) -> Result<Edit, EditError> {
    let input = input.ok_or(EditError::MissingTerminationInput)?;
    if !(input.q_final > 0.0) {
        return Err(EditError::MissingTerminationInput);
    }

    let life = life_bound(first, &input.well_life, axis)?;
    let end = match rate_bound(last, input.q_final) {
        Some(rate_end) => rate_end.min(life),
        None => life,
    };
    log::debug!(
        "Terminierung: q_final={} → Ende {} (Lebensdauer-Grenze {})",
        input.q_final,
        end,
        life
    );
    last.change_end_idx(end as f64)
}

impl SegmentChain {
    /// Terminiert das letzte Segment und setzt das Enddatum der Kette.
    pub fn apply_termination(
        &mut self,
        input: Option<&QFinalDict>,
        axis: &DomainAxis,
    ) -> Result<Vec<RangeWarning>, EditError> {
        let (Some(first), Some(last)) = (self.first().copied(), self.last().copied()) else {
            return Err(EditError::SegmentIndexOutOfRange { index: 0, len: 0 });
        };
        let edit = apply_termination(&last, &first, input, axis)?;
        let end_idx = edit.segment.end_idx();
        self.apply_edit(self.len() - 1, edit.segment)?;
        self.set_end_criterion(EndCriterion::EndDate(end_idx));
        Ok(edit.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ranges::Q_MIN;
    use crate::core::segment::SegmentShape;

    fn exp_dec(start: i64, end: i64, q_start: f64, d_eff: f64) -> Segment {
        Segment::new(start, end, SegmentShape::ExpDec { q_start, d_eff }).expect("gültig")
    }

    fn twenty_years(q_final: f64) -> QFinalDict {
        QFinalDict {
            q_final,
            well_life: WellLifeMethod::DurationFromFirstData {
                num: 20,
                unit: LifeUnit::Years,
            },
        }
    }

    #[test]
    fn test_rate_bound_wins_when_earlier() {
        // 100 → 5 bei 30 %/a: ln(20)/ln(1/0.7) ≈ 8,4 Jahre
        let segment = exp_dec(0, 100, 100.0, 0.3);
        let input = twenty_years(5.0);
        let edit = apply_termination(&segment, &segment, Some(&input), &DomainAxis::relative())
            .expect("terminierbar");

        let expected_rate_idx = segment
            .law()
            .time_to_rate(5.0)
            .map(|dt| dt.round() as i64)
            .expect("erreichbar");
        let expected_life_idx = (20.0 * DAYS_PER_YEAR).round() as i64 - 1;
        assert_eq!(
            edit.segment.end_idx(),
            expected_rate_idx.min(expected_life_idx)
        );
        assert_eq!(edit.segment.end_idx(), expected_rate_idx);
    }

    #[test]
    fn test_life_bound_wins_when_earlier() {
        let segment = exp_dec(0, 100, 100.0, 0.05);
        let edit = apply_termination(
            &segment,
            &segment,
            Some(&twenty_years(5.0)),
            &DomainAxis::relative(),
        )
        .expect("terminierbar");
        assert_eq!(edit.segment.end_idx(), 7304);
        assert_eq!(edit.segment.d_eff(), Some(0.05), "Form bleibt");
    }

    #[test]
    fn test_life_counts_from_first_segment() {
        let first = exp_dec(0, 364, 100.0, 0.2);
        let last = exp_dec(365, 1000, 80.0, 0.01);
        let input = QFinalDict {
            q_final: 1.0,
            well_life: WellLifeMethod::DurationFromFirstData {
                num: 2,
                unit: LifeUnit::Years,
            },
        };
        let edit = apply_termination(&last, &first, Some(&input), &DomainAxis::relative())
            .expect("terminierbar");
        assert_eq!(edit.segment.end_idx(), 730);
    }

    #[test]
    fn test_dated_axis_uses_calendar_years() {
        let axis = DomainAxis::dated();
        let start_date = NaiveDate::from_ymd_opt(2020, 3, 1).expect("Datum");
        let start = axis.idx_from_date(start_date);
        let segment = exp_dec(start, start + 100, 100.0, 0.01);
        let edit = apply_termination(&segment, &segment, Some(&twenty_years(1.0)), &axis)
            .expect("terminierbar");
        let end_date = axis.date_from_idx(edit.segment.end_idx()).expect("Datum");
        assert_eq!(end_date, NaiveDate::from_ymd_opt(2040, 2, 29).expect("Datum"));
    }

    #[test]
    fn test_end_before_start_is_clamped_with_warning() {
        let first = exp_dec(0, 364, 100.0, 0.2);
        let last = exp_dec(365, 1000, 3.0, 0.2);
        let edit = apply_termination(
            &last,
            &first,
            Some(&twenty_years(5.0)),
            &DomainAxis::relative(),
        )
        .expect("terminierbar");
        assert_eq!(edit.segment.end_idx(), 365);
        assert!(edit.warnings.is_empty(), "Rate liegt schon am Start darunter");

        let fixed = QFinalDict {
            q_final: 1.0,
            well_life: WellLifeMethod::FixedDate {
                date: NaiveDate::from_ymd_opt(1900, 2, 1).expect("Datum"),
            },
        };
        let edit = apply_termination(&last, &first, Some(&fixed), &DomainAxis::dated())
            .expect("terminierbar");
        assert_eq!(edit.segment.end_idx(), 365);
        assert_eq!(edit.warnings.len(), 1);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let segment = exp_dec(0, 100, 100.0, 0.3);
        let axis = DomainAxis::relative();
        assert_eq!(
            apply_termination(&segment, &segment, None, &axis),
            Err(EditError::MissingTerminationInput)
        );
        assert_eq!(
            apply_termination(&segment, &segment, Some(&twenty_years(0.0)), &axis),
            Err(EditError::MissingTerminationInput)
        );
    }

    #[test]
    fn test_fixed_date_not_applicable_in_relative_mode() {
        let segment = exp_dec(0, 100, 100.0, 0.3);
        let input = QFinalDict {
            q_final: 5.0,
            well_life: WellLifeMethod::FixedDate {
                date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("Datum"),
            },
        };
        assert_eq!(
            apply_termination(&segment, &segment, Some(&input), &DomainAxis::relative()),
            Err(EditError::WellLifeNotApplicable)
        );
    }

    #[test]
    fn test_chain_termination_sets_end_date() {
        let mut chain = SegmentChain::from_segments(
            vec![exp_dec(0, 99, 100.0, 0.3), exp_dec(100, 500, 90.0, 0.3)],
            true,
        )
        .expect("lückenlos");
        chain
            .apply_termination(Some(&twenty_years(5.0)), &DomainAxis::relative())
            .expect("terminierbar");
        let end = chain.last().expect("Segment").end_idx();
        assert!(end > 500);
        assert_eq!(chain.end_criterion(), EndCriterion::EndDate(end));
        assert!(chain.is_contiguous());
    }

    fn extreme_hyperbolic(start: i64, end: i64) -> Segment {
        Segment::new(
            start,
            end,
            SegmentShape::Arps {
                q_start: 1e4,
                d_eff: crate::core::ranges::D_EFF_MIN,
                b: crate::core::ranges::B_MAX,
            },
        )
        .expect("gültig")
    }

    #[test]
    fn test_unreachable_rate_for_extreme_hyperbola_falls_back_to_life() {
        let segment = extreme_hyperbolic(100, 465);
        let input = QFinalDict {
            q_final: 1.0,
            well_life: WellLifeMethod::DurationFromFirstData {
                num: 20,
                unit: LifeUnit::Years,
            },
        };
        let edit = apply_termination(&segment, &segment, Some(&input), &DomainAxis::relative())
            .expect("terminierbar");

        let expected = 100 + (20.0 * DAYS_PER_YEAR).round() as i64 - 1;
        assert_eq!(edit.segment.end_idx(), expected);
        assert!(edit.segment.q_end().expect("q_end").is_finite());
    }

    #[test]
    fn test_far_life_bound_is_capped_at_index_limit() {
        let axis = DomainAxis::dated();
        let segment = extreme_hyperbolic(45_000, 46_000);
        let input = QFinalDict {
            q_final: Q_MIN,
            well_life: WellLifeMethod::FixedDate {
                date: NaiveDate::from_ymd_opt(2700, 1, 1).expect("Datum"),
            },
        };
        let edit = apply_termination(&segment, &segment, Some(&input), &axis)
            .expect("terminierbar");

        assert_eq!(edit.segment.end_idx(), IDX_MAX, "Ende an der Indexgrenze");
    }

    #[test]
    fn test_termination_dict_json_shape() {
        let json = r#"{"q_final":5.0,"well_life":{"method":"duration_from_first_data","num":20,"unit":"years"}}"#;
        let parsed: QFinalDict = serde_json::from_str(json).expect("parsebar");
        assert_eq!(parsed, twenty_years(5.0));
    }
}
