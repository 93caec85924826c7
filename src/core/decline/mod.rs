//! Decline-Gleichungen: zustandslose Ratengesetze je Segmenttyp.
//!
//! Alle Gesetze arbeiten auf `dt` = Tage seit Segmentbeginn und mit nominalen
//! Decline-Raten pro Tag. Die Umrechnung effektiv (jährlich) ↔ nominal liegt
//! in [`conversion`].

mod arps;
mod arps_modified;
pub mod conversion;
mod exponential;
mod linear;

pub use arps::Arps;
pub use arps_modified::ModifiedArps;
pub use conversion::DAYS_PER_YEAR;
pub use exponential::Exponential;
pub use linear::{Flat, Linear, ZeroRate};

/// Unterhalb dieses b-Faktors wird Arps als Exponentialgesetz ausgewertet.
pub const B_EPSILON: f64 = 1e-6;

/// Gemeinsame Schnittstelle aller Ratengesetze.
pub trait DeclineLaw {
    /// Rate `q(dt)`.
    fn rate(&self, dt: f64) -> f64;

    /// Erste Ableitung `dq/dt` (Rate pro Tag).
    fn derivative(&self, dt: f64) -> f64;

    /// Zeitpunkt `dt ≥ 0`, an dem die Rate `q` erreicht wird.
    ///
    /// `None`, wenn das Gesetz die Rate nie (oder nur rückwärts) erreicht.
    fn time_to_rate(&self, q: f64) -> Option<f64>;

    /// Kumuliertes Volumen `∫₀^dt q(t) dt`.
    fn volume(&self, dt: f64) -> f64;
}

/// Konkretes Gesetz eines Segments; einziger Dispatch-Punkt über die Typen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Law {
    Flat(Flat),
    Zero(ZeroRate),
    Linear(Linear),
    Exponential(Exponential),
    Arps(Arps),
    ModifiedArps(ModifiedArps),
}

impl Law {
    fn inner(&self) -> &dyn DeclineLaw {
        match self {
            Law::Flat(law) => law,
            Law::Zero(law) => law,
            Law::Linear(law) => law,
            Law::Exponential(law) => law,
            Law::Arps(law) => law,
            Law::ModifiedArps(law) => law,
        }
    }
}

impl DeclineLaw for Law {
    fn rate(&self, dt: f64) -> f64 {
        self.inner().rate(dt)
    }

    fn derivative(&self, dt: f64) -> f64 {
        self.inner().derivative(dt)
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        self.inner().time_to_rate(q)
    }

    fn volume(&self, dt: f64) -> f64 {
        self.inner().volume(dt)
    }
}

/// Prüft ob ein gelöster Zeitpunkt verwertbar ist.
fn valid_time(t: f64) -> Option<f64> {
    (t.is_finite() && t >= 0.0).then_some(t)
}
