//! Segmentkette: geordnete, lückenlose Folge von Segmenten.
//!
//! Invariante: `segments[i].end_idx() + 1 == segments[i + 1].start_idx()`.
//! Jede mutierende Operation arbeitet auf einer Kopie der Segmentliste und
//! übernimmt sie erst nach erfolgreicher Prüfung (alles oder nichts).

use super::error::{EditError, RangeWarning};
use super::ranges::Q_MIN;
use super::segment::{Segment, SegmentDefaults, SegmentType};
use serde::{Deserialize, Serialize};

/// Endkriterium der Prognose (am letzten Segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "idx", rename_all = "snake_case")]
pub enum EndCriterion {
    /// Prognose läuft bis zur Wirtschaftlichkeitsgrenze
    #[default]
    EconomicLimit,
    /// Prognose endet an festem Index
    EndDate(i64),
}

/// Seite eines Segments bei Grenzverschiebungen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySide {
    Start,
    End,
}

/// Prüft die Kontiguität einer Segmentfolge.
pub fn validate_contiguity(segments: &[Segment]) -> Result<(), EditError> {
    for (i, pair) in segments.windows(2).enumerate() {
        if pair[0].end_idx() + 1 != pair[1].start_idx() {
            return Err(EditError::NotContiguous { index: i + 1 });
        }
    }
    Ok(())
}

/// Geordnete Segmentkette einer Prognose.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentChain {
    segments: Vec<Segment>,
    relative_time: bool,
    end_criterion: EndCriterion,
}

impl SegmentChain {
    /// Erstellt eine leere Kette.
    pub fn new(relative_time: bool) -> Self {
        Self {
            segments: Vec::new(),
            relative_time,
            end_criterion: EndCriterion::EconomicLimit,
        }
    }

    /// Erstellt eine Kette aus Segmenten; lehnt nicht-lückenlose Folgen ab.
    pub fn from_segments(segments: Vec<Segment>, relative_time: bool) -> Result<Self, EditError> {
        validate_contiguity(&segments)?;
        Ok(Self {
            segments,
            relative_time,
            end_criterion: EndCriterion::EconomicLimit,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Segment> {
        self.segments.get(idx)
    }

    /// Segment am Index oder [`EditError::SegmentIndexOutOfRange`].
    pub fn segment(&self, idx: usize) -> Result<&Segment, EditError> {
        self.segments
            .get(idx)
            .ok_or(EditError::SegmentIndexOutOfRange {
                index: idx,
                len: self.segments.len(),
            })
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// `true` = Indizes sind relative Offsets (Typkurven-Modus).
    pub fn relative_time(&self) -> bool {
        self.relative_time
    }

    pub fn end_criterion(&self) -> EndCriterion {
        self.end_criterion
    }

    pub fn set_end_criterion(&mut self, criterion: EndCriterion) {
        self.end_criterion = criterion;
    }

    pub fn is_contiguous(&self) -> bool {
        validate_contiguity(&self.segments).is_ok()
    }

    /// Gesamter Indexbereich `(start, end)` der Kette.
    pub fn span(&self) -> Option<(i64, i64)> {
        Some((self.first()?.start_idx(), self.last()?.end_idx()))
    }

    /// Rate am Index, sofern ein Segment ihn abdeckt.
    pub fn rate_at(&self, idx: i64) -> Option<f64> {
        self.segments
            .iter()
            .find(|segment| segment.contains(idx))
            .map(|segment| segment.rate_at(idx))
    }

    /// Kumuliertes Volumen aller Segmente.
    pub fn total_volume(&self) -> f64 {
        self.segments.iter().map(Segment::volume).sum()
    }

    /// Verschiebt alle Segmente vor (`toward_start`) bzw. nach `from_idx` um `offset`.
    pub fn shift_self_idx(&mut self, offset: i64, from_idx: usize, toward_start: bool) {
        if offset == 0 {
            return;
        }
        let range = if toward_start {
            0..from_idx.min(self.segments.len())
        } else {
            (from_idx + 1).min(self.segments.len())..self.segments.len()
        };
        for segment in &mut self.segments[range] {
            *segment = segment.shifted(offset);
        }
    }

    /// Ersetzt das Segment am Index und verschiebt die Nachbarn so, dass die
    /// Kette lückenlos bleibt.
    pub fn apply_edit(&mut self, idx: usize, segment: Segment) -> Result<(), EditError> {
        let old = *self.segment(idx)?;
        let mut next = self.clone();
        next.segments[idx] = segment;
        next.shift_self_idx(segment.end_idx() - old.end_idx(), idx, false);
        next.shift_self_idx(segment.start_idx() - old.start_idx(), idx, true);
        validate_contiguity(&next.segments)?;
        *self = next;
        Ok(())
    }

    /// Verschiebt eine gemeinsame Segmentgrenze um `offset`; der Nachbar wird
    /// dabei verkürzt bzw. verlängert.
    ///
    /// Abgelehnt, wenn ein beteiligtes Segment kürzer als ein Tag würde.
    pub fn move_boundary(
        &mut self,
        idx: usize,
        side: BoundarySide,
        offset: i64,
    ) -> Result<(), EditError> {
        let current = *self.segment(idx)?;
        let (start, end) = match side {
            BoundarySide::End => (current.start_idx(), current.end_idx() + offset),
            BoundarySide::Start => (current.start_idx() + offset, current.end_idx()),
        };
        let moved = Segment::new(start, end, *current.shape())
            .map_err(|_| EditError::SpanTooShort { index: idx })?;
        self.replace_at_boundary(idx, side, moved)
    }

    /// Setzt ein Segment ein, dessen Spanne nur an der Seite `side` abweicht.
    /// Der Nachbar an dieser Seite wird verkürzt bzw. verlängert, alle übrigen
    /// Segmente bleiben liegen.
    ///
    /// Abgelehnt, wenn der Nachbar kürzer als ein Tag würde.
    pub fn replace_at_boundary(
        &mut self,
        idx: usize,
        side: BoundarySide,
        segment: Segment,
    ) -> Result<(), EditError> {
        let current = *self.segment(idx)?;
        let mut segments = self.segments.clone();
        let too_short = |index: usize| move |_: EditError| EditError::SpanTooShort { index };

        match side {
            BoundarySide::End => {
                let offset = segment.end_idx() - current.end_idx();
                if let Some(next) = self.segments.get(idx + 1) {
                    segments[idx + 1] =
                        Segment::new(next.start_idx() + offset, next.end_idx(), *next.shape())
                            .map_err(too_short(idx + 1))?;
                }
            }
            BoundarySide::Start => {
                let offset = segment.start_idx() - current.start_idx();
                if idx > 0 {
                    let prev = self.segments[idx - 1];
                    segments[idx - 1] =
                        Segment::new(prev.start_idx(), prev.end_idx() + offset, *prev.shape())
                            .map_err(too_short(idx - 1))?;
                }
            }
        }
        segments[idx] = segment;

        validate_contiguity(&segments)?;
        self.segments = segments;
        Ok(())
    }

    /// Verschiebt die gesamte Kette um `offset` Tage.
    pub fn shift_all(&mut self, offset: i64) {
        for segment in &mut self.segments {
            *segment = segment.shifted(offset);
        }
        if let EndCriterion::EndDate(idx) = self.end_criterion {
            self.end_criterion = EndCriterion::EndDate(idx + offset);
        }
    }

    /// Skaliert `q_start` aller Segmente mit Rate um `factor`.
    pub fn scale_q_starts(&mut self, factor: f64) -> Result<Vec<RangeWarning>, EditError> {
        let mut segments = self.segments.clone();
        let mut warnings = Vec::new();
        for segment in &mut segments {
            if let Some(q_start) = segment.q_start() {
                let mut edit = segment.change_q_start(q_start * factor)?;
                warnings.append(&mut edit.warnings);
                *segment = edit.segment;
            }
        }
        self.segments = segments;
        Ok(warnings)
    }

    /// Fügt ein Standardsegment vorne oder hinten an und liefert dessen Index.
    ///
    /// Das neue Segment übernimmt den Grenzwert des angrenzenden Segments.
    pub fn add_segment(
        &mut self,
        segment_type: SegmentType,
        at_end: bool,
        max_segments: usize,
        defaults: &SegmentDefaults,
    ) -> Result<usize, EditError> {
        if self.segments.len() >= max_segments {
            return Err(EditError::MaxSegmentsExceeded { max: max_segments });
        }
        let duration = defaults.duration.max(1);

        let (Some(first), Some(last)) = (self.first().copied(), self.last().copied()) else {
            let shape = defaults.shape(segment_type, defaults.q_start);
            self.segments.push(Segment::new(0, duration - 1, shape)?);
            return Ok(0);
        };

        if at_end {
            let start = last.end_idx() + 1;
            let q_start = last
                .q_end()
                .filter(|q| *q >= Q_MIN)
                .unwrap_or(defaults.q_start);
            let shape = defaults.shape(segment_type, q_start);
            self.segments
                .push(Segment::new(start, start + duration - 1, shape)?);
            Ok(self.segments.len() - 1)
        } else {
            let end = first.start_idx() - 1;
            let anchor = first.q_start().filter(|q| *q >= Q_MIN);
            let shape = defaults.shape(segment_type, anchor.unwrap_or(defaults.q_start));
            let mut segment = Segment::new(end - duration + 1, end, shape)?;
            if let (Some(anchor), Some(_)) = (anchor, segment.q_start()) {
                segment = segment.translate_to_q_end(anchor)?.segment;
            }
            self.segments.insert(0, segment);
            Ok(0)
        }
    }

    /// Entfernt das erste oder letzte Segment.
    ///
    /// `min_segments` ist die Anzahl Segmente, die immer erhalten bleiben muss.
    /// Nach Entfernen des letzten Segments wird ein Enddatum auf die
    /// Wirtschaftlichkeitsgrenze zurückgesetzt.
    pub fn remove_segment(
        &mut self,
        idx: usize,
        min_segments: usize,
    ) -> Result<Segment, EditError> {
        let len = self.segments.len();
        if len == 0 || (len == 1 && min_segments >= 1) {
            return Err(EditError::NoSegmentsToRemove);
        }
        self.segment(idx)?;
        if len <= min_segments {
            return Err(EditError::CannotRemoveLastSegment);
        }
        if idx != 0 && idx != len - 1 {
            return Err(EditError::OnlyFirstOrLastRemovable);
        }

        let removed = self.segments.remove(idx);
        if idx == len - 1 && matches!(self.end_criterion, EndCriterion::EndDate(_)) {
            self.end_criterion = EndCriterion::EconomicLimit;
        }
        Ok(removed)
    }
}
