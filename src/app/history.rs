use super::SelectionState;
use crate::core::{LockState, SegmentChain};
use std::sync::Arc;

/// Snapshot reduziert auf die für Undo/Redo relevanten Teile.
///
/// Nutzt Arc-Clone (Copy-on-Write): Das Erstellen eines Snapshots ist O(1),
/// die Kette wird erst beim nächsten `Arc::make_mut()` tatsächlich kopiert.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Segmentkette (Arc-Klon für O(1)-Snapshot)
    pub chain: Arc<SegmentChain>,
    /// Selektionszustand zum Zeitpunkt des Snapshots
    pub selection: SelectionState,
    /// Sperrzustand zum Zeitpunkt des Snapshots
    pub lock: LockState,
}

impl Snapshot {
    /// Erstellt einen O(1)-Snapshot durch Arc-Clone statt Deep-Clone.
    pub fn from_state(state: &crate::app::AppState) -> Self {
        Self {
            chain: Arc::clone(&state.chain),
            selection: state.selection,
            lock: state.lock,
        }
    }

    /// Stellt den Snapshot wieder her (O(1) Arc-Zuweisung).
    pub fn apply_to(self, state: &mut crate::app::AppState) {
        state.chain = self.chain;
        state.selection = self.selection;
        state.lock = self.lock;
    }
}

/// Einfacher Undo/Redo-Manager mit Snapshotting.
#[derive(Default)]
pub struct EditHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    /// Legt einen fertigen Snapshot ab und verwirft den Redo-Stack.
    pub fn record_snapshot(&mut self, snap: Snapshot) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snap);
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Anzahl möglicher Undo-Schritte.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Holt den letzten Undo-Eintrag und legt `current` auf den Redo-Stack.
    pub fn pop_undo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop()?;
        if self.redo_stack.len() >= self.max_depth {
            self.redo_stack.remove(0);
        }
        self.redo_stack.push(current);
        Some(prev)
    }

    /// Holt den letzten Redo-Eintrag und legt `current` auf den Undo-Stack.
    pub fn pop_redo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(current);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::core::{Segment, SegmentShape};

    fn make_snapshot_with_segment_count(count: usize) -> Snapshot {
        let segments = (0..count as i64)
            .map(|i| {
                Segment::new(i * 10, i * 10 + 9, SegmentShape::Flat { q_start: 50.0 })
                    .expect("gültiges Segment")
            })
            .collect();
        let mut state = AppState::new();
        state.chain = Arc::new(SegmentChain::from_segments(segments, false).expect("lückenlos"));
        Snapshot::from_state(&state)
    }

    #[test]
    fn empty_history_cannot_undo_or_redo() {
        let history = EditHistory::new_with_capacity(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_restores_previous_snapshot() {
        let mut history = EditHistory::new_with_capacity(10);
        history.record_snapshot(make_snapshot_with_segment_count(2));

        let restored = history
            .pop_undo_with_current(make_snapshot_with_segment_count(5))
            .expect("undo vorhanden");

        assert_eq!(restored.chain.len(), 2);
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn redo_restores_undone_snapshot() {
        let mut history = EditHistory::new_with_capacity(10);
        history.record_snapshot(make_snapshot_with_segment_count(2));
        let _restored = history.pop_undo_with_current(make_snapshot_with_segment_count(5));

        let redone = history
            .pop_redo_with_current(make_snapshot_with_segment_count(2))
            .expect("redo vorhanden");

        assert_eq!(redone.chain.len(), 5);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn new_record_clears_redo_stack() {
        let mut history = EditHistory::new_with_capacity(10);
        history.record_snapshot(make_snapshot_with_segment_count(1));
        let _restored = history.pop_undo_with_current(make_snapshot_with_segment_count(3));
        assert!(history.can_redo());

        history.record_snapshot(make_snapshot_with_segment_count(4));
        assert!(!history.can_redo());
    }

    #[test]
    fn respects_max_depth() {
        let mut history = EditHistory::new_with_capacity(3);
        for i in 1..=5 {
            history.record_snapshot(make_snapshot_with_segment_count(i));
        }
        assert_eq!(history.undo_len(), 3);

        let oldest = (0..3)
            .filter_map(|_| history.pop_undo_with_current(make_snapshot_with_segment_count(9)))
            .last()
            .expect("drei Einträge");
        assert_eq!(oldest.chain.len(), 3, "älteste Einträge verworfen");
    }

    #[test]
    fn snapshot_shares_chain_until_mutation() {
        let mut state = AppState::new();
        state.chain = make_snapshot_with_segment_count(2).chain;
        let snap = Snapshot::from_state(&state);
        assert!(Arc::ptr_eq(&snap.chain, &state.chain));

        Arc::make_mut(&mut state.chain).shift_all(5);
        assert!(!Arc::ptr_eq(&snap.chain, &state.chain));
        assert_eq!(snap.chain.first().map(|s| s.start_idx()), Some(0));
    }

    #[test]
    fn snapshot_apply_to_restores_selection_and_lock() {
        let mut original = AppState::new();
        original.chain = make_snapshot_with_segment_count(3).chain;
        original.selection.selected_segment = Some(1);
        original.lock = LockState::default_for(crate::core::SegmentType::Flat);

        let snap = Snapshot::from_state(&original);
        let mut target = AppState::new();
        snap.apply_to(&mut target);

        assert_eq!(target.chain.len(), 3);
        assert_eq!(target.selection.selected_segment, Some(1));
        assert_eq!(target.lock, original.lock);
    }
}
