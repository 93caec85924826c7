/// View-bezogener Anwendungszustand
#[derive(Debug, Default)]
pub struct ViewState {
    /// Zähler abgeschlossener Änderungen; der Renderer baut nur bei Änderung neu
    pub render_revision: u64,
}

impl ViewState {
    /// Erstellt den Standard-View-Zustand.
    pub fn new() -> Self {
        Self { render_revision: 0 }
    }

    /// Signalisiert dem Renderer eine abgeschlossene Änderung.
    pub fn bump_revision(&mut self) {
        self.render_revision = self.render_revision.wrapping_add(1);
    }
}
