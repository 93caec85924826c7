use crate::app::session::KeyCombo;
use crate::core::{Direction, EndCriterion, QFinalDict, SegmentParam, SegmentType, ViewValue};
use crate::shared::EditorOptions;
use std::path::PathBuf;
use std::time::Instant;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    // === Datei ===
    /// Datensatz-Datei laden
    LoadFile { path: PathBuf },
    /// Kette speichern; ohne Pfad unter dem aktuellen Dateipfad
    SaveFile { path: Option<PathBuf> },
    /// Leere Kette anlegen
    NewChain { relative_time: bool },
    /// Beenden anfordern
    RequestExit,

    // === Selektion ===
    /// Segment selektieren
    SelectSegment { index: usize },

    // === Parameter ===
    /// Parameter des selektierten Segments setzen
    EditParameter { param: SegmentParam, value: ViewValue },
    /// Sperre umschalten
    ToggleLock { param: SegmentParam },

    // === Grenzoperationen ===
    Anchor { direction: Direction },
    Connect { direction: Direction },
    MatchSlope,

    // === Struktur ===
    AddSegment {
        segment_type: SegmentType,
        at_end: bool,
    },
    RemoveSelectedSegment,

    // === Terminierung ===
    SetTerminationInput { input: Option<QFinalDict> },
    ApplyTermination,
    SetEndCriterion { criterion: EndCriterion },

    // === History ===
    Undo,
    Redo,

    // === Tastatur-Sitzung ===
    /// Gehaltene Taste starten (erster Schritt sofort)
    BeginStep { combo: KeyCombo, now: Instant },
    /// Taste losgelassen, Commit nach Ruhezeit
    EndStep { now: Instant },
    /// Sitzung vorantreiben
    PollSession { now: Instant },
    /// Beschleunigung abbrechen, angewendete Schritte übernehmen
    CancelSession,

    // === Optionen ===
    ApplyOptions { options: EditorOptions },
    ResetOptions,
}
