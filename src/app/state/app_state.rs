use crate::app::history::{EditHistory, Snapshot};
use crate::app::session::{InteractiveSession, SessionTiming};
use crate::app::CommandLog;
use crate::core::{
    DomainAxis, LockState, QFinalDict, Segment, SegmentChain, UnitSystem,
};
use crate::shared::EditorOptions;
use std::sync::Arc;

use super::{SelectionState, UiState, ViewState};

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Aktuelle Segmentkette (Arc für O(1)-Snapshots)
    pub chain: Arc<SegmentChain>,
    /// View-State
    pub view: ViewState,
    /// UI-State
    pub ui: UiState,
    /// Selection-State
    pub selection: SelectionState,
    /// Gesperrter Parameter des selektierten Segments
    pub lock: LockState,
    /// Tastatur-Sitzung für gehaltene Pfeiltasten
    pub session: InteractiveSession,
    /// Zustand vor dem ersten Schritt der laufenden Sitzung
    pub pending_commit: Option<Snapshot>,
    /// Terminierungs-Eingabe der Phase
    pub termination: Option<QFinalDict>,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Undo/Redo-History (Snapshot-basiert)
    pub history: EditHistory,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Signalisiert dem Host, die Anwendung kontrolliert zu beenden
    pub should_exit: bool,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State mit Standard-Optionen
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Erstellt einen leeren App-State mit den übergebenen Optionen.
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            chain: Arc::new(SegmentChain::new(false)),
            view: ViewState::new(),
            ui: UiState::new(),
            selection: SelectionState::new(),
            lock: LockState::none(),
            session: InteractiveSession::new(SessionTiming::from_options(&options)),
            pending_commit: None,
            termination: None,
            command_log: CommandLog::new(),
            history: EditHistory::new_with_capacity(options.history_depth),
            options,
            should_exit: false,
        }
    }

    /// Einheitensystem aus Optionen und Zeitmodus der Kette.
    pub fn units(&self) -> UnitSystem {
        UnitSystem::new(
            self.options.rate_basis,
            DomainAxis::new(self.chain.relative_time(), self.options.epoch),
        )
    }

    /// Selektiertes Segment samt Index.
    pub fn selected_segment(&self) -> Option<(usize, &Segment)> {
        let idx = self.selection.selected_segment?;
        self.chain.get(idx).map(|segment| (idx, segment))
    }

    /// Gibt die Anzahl der Segmente zurück (für UI-Anzeige)
    pub fn segment_count(&self) -> usize {
        self.chain.len()
    }

    /// Undo/Redo helpers
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Übernimmt die Schritte der laufenden Sitzung als einen History-Eintrag.
    ///
    /// Gibt `true` zurück, wenn ein Eintrag geschrieben wurde.
    pub fn commit_pending(&mut self) -> bool {
        match self.pending_commit.take() {
            Some(snap) => {
                self.history.record_snapshot(snap);
                self.view.bump_revision();
                true
            }
            None => false,
        }
    }

    /// Bricht eine laufende Tastatur-Sitzung ab; bereits angewendete
    /// Schritte bleiben erhalten und werden übernommen.
    pub fn settle_session(&mut self) {
        self.session.cancel();
        if self.commit_pending() {
            log::debug!("Laufende Tastatur-Sitzung übernommen");
        }
    }

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    /// Reduziert Boilerplate in mutierenden Use-Cases.
    pub fn record_undo_snapshot(&mut self) {
        self.settle_session();
        let snap = Snapshot::from_state(self);
        self.history.record_snapshot(snap);
    }

    /// Übernimmt eine fertig berechnete Kette als abgeschlossene Änderung.
    pub fn commit_chain(&mut self, chain: SegmentChain) {
        self.record_undo_snapshot();
        self.chain = Arc::new(chain);
        self.selection.clamp_to(self.chain.len());
        self.view.bump_revision();
    }

    /// Setzt die History zurück (neue Datei bzw. neue Kette).
    pub fn reset_history(&mut self) {
        self.session.cancel();
        self.pending_commit = None;
        self.history = EditHistory::new_with_capacity(self.options.history_depth);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
