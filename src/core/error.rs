//! Fehler- und Warnungstypen der Editier-Engine.
//!
//! Alle Fehler sind wiederherstellbar: die Operation wird abgebrochen und die
//! Kette bleibt im vorherigen gültigen Zustand.

use super::segment::{SegmentParam, SegmentType};
use std::fmt;

/// Abgewiesene Editier-Operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    // ── Kontinuität ─────────────────────────────────────────────
    #[error("Kein Nachbarsegment in dieser Richtung vorhanden")]
    NoNeighbor,
    #[error("Verbinden mit Nachbarsegment nicht möglich: {reason}")]
    IncompatibleNeighbor { reason: &'static str },
    #[error("Indizes an der Segmentgrenze sind inkonsistent ({left_end} + 1 ≠ {right_start})")]
    InconsistentIndices { left_end: i64, right_start: i64 },
    #[error("Kein vorheriges Segment für Steigungsanpassung vorhanden")]
    NoPreviousSegment,
    #[error("Segmenttyp {0} kann keine beliebige Steigung annehmen")]
    SlopeNotMatchable(SegmentType),
    #[error("Vorheriges Segment vom Typ {0} liefert keine übertragbare Steigung")]
    PreviousNotSlopeCompatible(SegmentType),
    #[error("Steigung {slope:.6} ist für einen Decline-Typ nicht fallend")]
    NonDecliningSlope { slope: f64 },

    // ── Struktur ────────────────────────────────────────────────
    #[error("Maximale Segmentanzahl ({max}) überschritten")]
    MaxSegmentsExceeded { max: usize },
    #[error("Keine Segmente zum Entfernen vorhanden")]
    NoSegmentsToRemove,
    #[error("Letztes Segment kann nicht entfernt werden")]
    CannotRemoveLastSegment,
    #[error("Nur das erste oder letzte Segment kann entfernt werden")]
    OnlyFirstOrLastRemovable,
    #[error("Segmentindex {index} außerhalb der Kette (Länge {len})")]
    SegmentIndexOutOfRange { index: usize, len: usize },
    #[error("Segmente sind nicht lückenlos aneinandergereiht (Segment {index})")]
    NotContiguous { index: usize },
    #[error("Indexänderung würde Segment {index} auf weniger als einen Tag verkürzen")]
    SpanTooShort { index: usize },

    // ── Parameter ───────────────────────────────────────────────
    #[error("Parameter {param} existiert nicht für Segmenttyp {segment_type}")]
    ParameterNotApplicable {
        param: SegmentParam,
        segment_type: SegmentType,
    },
    #[error("Ungültiger Wert für {param}: {value}")]
    NotFinite { param: SegmentParam, value: f64 },
    #[error("Wert {value} für {param} außerhalb des zulässigen Bereichs [{min}, {max}]")]
    OutOfRange {
        param: SegmentParam,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Startindex {start} liegt nach Endindex {end}")]
    InvertedRange { start: i64, end: i64 },
    #[error("Rate {rate} ist mit dem aktuellen Verlauf nicht erreichbar")]
    RateUnreachable { rate: f64 },
    #[error("Datumswert für {0} im relativen Zeitmodus nicht zulässig")]
    DateInRelativeMode(SegmentParam),
    #[error("Datum außerhalb des darstellbaren Bereichs")]
    DateOutOfRange,

    // ── Terminierung ────────────────────────────────────────────
    #[error("q-final und Lebensdauer-Regel müssen angegeben werden")]
    MissingTerminationInput,
    #[error("Lebensdauer-Regel im relativen Zeitmodus nicht anwendbar")]
    WellLifeNotApplicable,
}

/// Nicht-fataler Hinweis: ein Wert wurde auf seine Bereichsgrenze geklemmt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeWarning {
    pub param: SegmentParam,
    pub requested: f64,
    pub bound: f64,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} außerhalb des zulässigen Bereichs, auf {} begrenzt",
            self.param, self.requested, self.bound
        )
    }
}
