use crate::app::session::KeyCombo;
use crate::core::{Direction, EndCriterion, QFinalDict, SegmentParam, SegmentType, ViewValue};
use crate::shared::EditorOptions;
use std::path::PathBuf;
use std::time::Instant;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    // === Datei ===
    /// Datensatz-Datei wurde ausgewählt
    FileSelected { path: PathBuf },
    /// Datei speichern (unter aktuellem Pfad oder mit Dialog)
    SaveRequested,
    /// Speicherpfad wurde ausgewählt
    SaveFilePathSelected { path: PathBuf },
    /// Neue, leere Kette beginnen
    NewChainRequested { relative_time: bool },
    /// Anwendung beenden
    ExitRequested,

    // === Selektion ===
    /// Segment in der Tabelle oder im Plot angeklickt
    SegmentSelected { index: usize },

    // === Parameter ===
    /// Wert eines Parameters im Eingabefeld bestätigt (Anzeige-Einheiten)
    ParameterEditRequested { param: SegmentParam, value: ViewValue },
    /// Sperre eines Parameters umschalten
    ToggleLockRequested { param: SegmentParam },

    // === Grenzoperationen ===
    /// Grenzwert an den Nachbarn angleichen (Form wird gelöst)
    AnchorRequested { direction: Direction },
    /// Segment an den Nachbarn heranschieben (Form bleibt)
    ConnectRequested { direction: Direction },
    /// Anfangssteigung an das vorherige Segment angleichen
    MatchSlopeRequested,

    // === Struktur ===
    /// Segment vorne oder hinten anfügen
    AddSegmentRequested {
        segment_type: SegmentType,
        at_end: bool,
    },
    /// Selektiertes Segment entfernen
    RemoveSelectedSegmentRequested,

    // === Terminierung ===
    /// Eingabe der Terminierung geändert
    TerminationInputChanged { input: Option<QFinalDict> },
    /// Terminierung auf das letzte Segment anwenden
    ApplyTerminationRequested,
    /// Endkriterium der Kette umgestellt
    EndCriterionChanged { criterion: EndCriterion },

    // === History ===
    UndoRequested,
    RedoRequested,

    // === Tastatur-Sitzung ===
    /// Pfeiltaste gedrückt
    StepKeyPressed { combo: KeyCombo, now: Instant },
    /// Pfeiltaste losgelassen
    StepKeyReleased { now: Instant },
    /// Zeitgeber des Hosts (pro Frame)
    SessionTick { now: Instant },
    /// Eingabefeld hat den Fokus verloren
    InputBlurred,

    // === Optionen ===
    /// Optionen wurden im Dialog geändert
    OptionsChanged { options: EditorOptions },
    /// Optionen auf Standardwerte zurücksetzen
    ResetOptionsRequested,
}
