//! Persistierte Segment-Datensätze und Abbildung auf die Segmentkette.

use super::chain::SegmentChain;
use super::error::EditError;
use super::ranges::validate_ranges;
use super::segment::{Segment, SegmentShape, SegmentType};
use serde::{Deserialize, Serialize};

/// Ein persistiertes Segment in Ketten-Reihenfolge.
///
/// `q_end` und `sw_idx` sind abgeleitete Werte: sie werden geschrieben, beim
/// Laden aber aus den übrigen Parametern neu berechnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedSegmentRecord {
    pub segment_type: SegmentType,
    pub start_idx: i64,
    pub end_idx: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q_end: Option<f64>,
    #[serde(default, rename = "D_eff", skip_serializing_if = "Option::is_none")]
    pub d_eff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(
        default,
        rename = "target_D_eff_sw",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_d_eff_sw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sw_idx: Option<i64>,
}

/// Fehler beim Aufbau einer Kette aus Datensätzen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Datensatz {index}: Parameter {name} fehlt für Typ {segment_type}")]
    MissingParameter {
        index: usize,
        name: &'static str,
        segment_type: SegmentType,
    },
    #[error("Datensatz {index}: {source}")]
    InvalidSegment { index: usize, source: EditError },
    #[error("Datensätze nicht lückenlos/überlappungsfrei: {0}")]
    NotContiguous(EditError),
}

impl OrderedSegmentRecord {
    /// Datensatz eines Segments (inklusive abgeleiteter Werte).
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            segment_type: segment.segment_type(),
            start_idx: segment.start_idx(),
            end_idx: segment.end_idx(),
            q_start: segment.q_start(),
            q_end: segment.q_end(),
            d_eff: segment.d_eff(),
            b: segment.b(),
            k: segment.k(),
            target_d_eff_sw: segment.target_d_eff_sw(),
            sw_idx: segment.sw_idx(),
        }
    }

    /// Baut das Segment des Datensatzes an Position `index`.
    pub fn to_segment(&self, index: usize) -> Result<Segment, RecordError> {
        let require = |value: Option<f64>, name: &'static str| {
            value.ok_or(RecordError::MissingParameter {
                index,
                name,
                segment_type: self.segment_type,
            })
        };

        let shape = match self.segment_type {
            SegmentType::Flat => SegmentShape::Flat {
                q_start: require(self.q_start, "q_start")?,
            },
            SegmentType::Empty => SegmentShape::Empty,
            SegmentType::Linear => SegmentShape::Linear {
                q_start: require(self.q_start, "q_start")?,
                k: require(self.k, "k")?,
            },
            SegmentType::ExpInc => SegmentShape::ExpInc {
                q_start: require(self.q_start, "q_start")?,
                d_eff: require(self.d_eff, "D_eff")?,
            },
            SegmentType::ExpDec => SegmentShape::ExpDec {
                q_start: require(self.q_start, "q_start")?,
                d_eff: require(self.d_eff, "D_eff")?,
            },
            SegmentType::Arps => SegmentShape::Arps {
                q_start: require(self.q_start, "q_start")?,
                d_eff: require(self.d_eff, "D_eff")?,
                b: require(self.b, "b")?,
            },
            SegmentType::ArpsModified => SegmentShape::ArpsModified {
                q_start: require(self.q_start, "q_start")?,
                d_eff: require(self.d_eff, "D_eff")?,
                b: require(self.b, "b")?,
                target_d_eff_sw: require(self.target_d_eff_sw, "target_D_eff_sw")?,
            },
        };

        Segment::new(self.start_idx, self.end_idx, shape)
            .and_then(|segment| validate_ranges(&segment).map(|()| segment))
            .map_err(|source| RecordError::InvalidSegment { index, source })
    }
}

/// Baut eine Kette aus Datensätzen; Fehler werden an den Aufrufer gemeldet.
pub fn try_build_chain(
    records: &[OrderedSegmentRecord],
    relative_time: bool,
) -> Result<SegmentChain, RecordError> {
    let segments = records
        .iter()
        .enumerate()
        .map(|(index, record)| record.to_segment(index))
        .collect::<Result<Vec<_>, _>>()?;
    SegmentChain::from_segments(segments, relative_time).map_err(RecordError::NotContiguous)
}

/// Baut eine Kette aus Datensätzen.
///
/// Fehlerhafte Datensätze (fehlende Parameter, Werte außerhalb der Bereiche,
/// Lücken oder Überlappungen) führen zu einer leeren Kette, damit die
/// Sitzung benutzbar bleibt.
pub fn build_chain(records: &[OrderedSegmentRecord], relative_time: bool) -> SegmentChain {
    match try_build_chain(records, relative_time) {
        Ok(chain) => chain,
        Err(e) => {
            log::warn!("Segment-Datensätze verworfen, starte mit leerer Kette: {}", e);
            SegmentChain::new(relative_time)
        }
    }
}

impl SegmentChain {
    /// Exakte Umkehrung von [`build_chain`].
    pub fn to_records(&self) -> Vec<OrderedSegmentRecord> {
        self.segments()
            .iter()
            .map(OrderedSegmentRecord::from_segment)
            .collect()
    }
}
