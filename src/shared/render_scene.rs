//! Render-Szene als expliziter Übergabevertrag zwischen App und Renderer.
//!
//! Lebt im shared-Modul, da `app` sie baut und ein Renderer sie konsumiert.

use crate::core::{SegmentChain, SegmentType};
use std::sync::Arc;

/// Abgetastete Kurve eines Segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentCurve {
    /// Position in der Kette
    pub index: usize,
    pub segment_type: SegmentType,
    /// Stützstellen `(idx, rate)`; leer für `empty`-Segmente
    pub points: Vec<(f64, f64)>,
    /// Umschaltpunkt von `arps_modified`
    pub switch_point: Option<(f64, f64)>,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone)]
pub struct CurveScene {
    /// Unveränderlicher Snapshot der Kette (Arc für O(1)-Clone)
    pub chain: Arc<SegmentChain>,
    /// Selektiertes Segment
    pub selected_segment: Option<usize>,
    /// Abgetastete Kurven je Segment
    pub curves: Vec<SegmentCurve>,
    /// Zähler der Commits; ändert sich nur nach abgeschlossenen Änderungen
    pub revision: u64,
}

impl CurveScene {
    /// Gibt zurück, ob Segmente für Rendering vorhanden sind.
    pub fn has_segments(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Größte abgetastete Rate (für die Achsenskalierung).
    pub fn max_rate(&self) -> f64 {
        self.curves
            .iter()
            .flat_map(|curve| curve.points.iter().map(|(_, q)| *q))
            .fold(0.0, f64::max)
    }
}
