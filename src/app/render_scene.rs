//! Builder für Render-Szenen aus dem AppState.

use crate::app::AppState;
use crate::core::{DeclineLaw, Segment, SegmentType};
use crate::shared::{CurveScene, SegmentCurve};
use std::sync::Arc;

/// Baut eine CurveScene aus dem aktuellen AppState.
pub fn build(state: &AppState) -> CurveScene {
    let samples = state.options.render_samples_per_segment.max(2);
    let curves = state
        .chain
        .segments()
        .iter()
        .enumerate()
        .map(|(index, segment)| sample_segment(index, segment, samples))
        .collect();

    CurveScene {
        chain: Arc::clone(&state.chain),
        selected_segment: state.selection.selected_segment,
        curves,
        revision: state.view.render_revision,
    }
}

/// Tastet ein Segment gleichmäßig zwischen `start_idx` und `end_idx` ab.
fn sample_segment(index: usize, segment: &Segment, samples: usize) -> SegmentCurve {
    let segment_type = segment.segment_type();
    if segment_type == SegmentType::Empty {
        return SegmentCurve {
            index,
            segment_type,
            points: Vec::new(),
            switch_point: None,
        };
    }

    let law = segment.law();
    let span = (segment.duration() - 1) as f64;
    let count = if span == 0.0 { 1 } else { samples };
    let points = (0..count)
        .map(|i| {
            let dt = if count == 1 {
                0.0
            } else {
                span * i as f64 / (count - 1) as f64
            };
            (segment.start_idx() as f64 + dt, law.rate(dt))
        })
        .collect();

    let switch_point = segment
        .sw_idx()
        .filter(|idx| segment.contains(*idx))
        .map(|idx| (idx as f64, segment.rate_at(idx)));

    SegmentCurve {
        index,
        segment_type,
        points,
        switch_point,
    }
}
