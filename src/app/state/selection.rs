/// Auswahlbezogener Anwendungszustand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Index des selektierten Segments in der Kette
    pub selected_segment: Option<usize>,
}

impl SelectionState {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self {
            selected_segment: None,
        }
    }

    /// Verwirft eine Selektion, die hinter dem Kettenende liegt.
    pub fn clamp_to(&mut self, len: usize) {
        if self.selected_segment.is_some_and(|idx| idx >= len) {
            self.selected_segment = len.checked_sub(1);
        }
    }
}
