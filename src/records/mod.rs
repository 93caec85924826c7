//! JSON Import/Export der Segment-Datensätze.
//!
//! Eine Datei enthält die geordneten Segment-Datensätze einer Phase, den
//! Zeitmodus, das Endkriterium und optional die Terminierungs-Eingabe.

pub mod parser;
pub mod writer;

use crate::core::{build_chain, EndCriterion, OrderedSegmentRecord, QFinalDict, SegmentChain};
use serde::{Deserialize, Serialize};

pub use parser::parse_records_document;
pub use writer::write_records_document;

/// Inhalt einer Datensatz-Datei.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub relative_time: bool,
    #[serde(default)]
    pub end_criterion: EndCriterion,
    pub segments: Vec<OrderedSegmentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<QFinalDict>,
}

fn default_version() -> u32 {
    RecordsDocument::CURRENT_VERSION
}

impl RecordsDocument {
    /// Höchste unterstützte Formatversion.
    pub const CURRENT_VERSION: u32 = 1;

    /// Dokument aus dem aktuellen Zustand einer Kette.
    pub fn from_chain(chain: &SegmentChain, termination: Option<QFinalDict>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            relative_time: chain.relative_time(),
            end_criterion: chain.end_criterion(),
            segments: chain.to_records(),
            termination,
        }
    }

    /// Baut die Kette; ungültige Datensätze ergeben eine leere Kette.
    pub fn to_chain(&self) -> SegmentChain {
        let mut chain = build_chain(&self.segments, self.relative_time);
        if !chain.is_empty() {
            chain.set_end_criterion(self.end_criterion);
        }
        chain
    }
}
