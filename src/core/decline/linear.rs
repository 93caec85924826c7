use super::{valid_time, DeclineLaw};

/// Konstante Rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flat {
    pub q: f64,
}

impl DeclineLaw for Flat {
    fn rate(&self, _dt: f64) -> f64 {
        self.q
    }

    fn derivative(&self, _dt: f64) -> f64 {
        0.0
    }

    fn time_to_rate(&self, _q: f64) -> Option<f64> {
        None
    }

    fn volume(&self, dt: f64) -> f64 {
        self.q * dt
    }
}

/// Leeres Segment: keine Förderung, nur Platzhalter für die Kontiguität.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZeroRate;

impl DeclineLaw for ZeroRate {
    fn rate(&self, _dt: f64) -> f64 {
        0.0
    }

    fn derivative(&self, _dt: f64) -> f64 {
        0.0
    }

    fn time_to_rate(&self, _q: f64) -> Option<f64> {
        None
    }

    fn volume(&self, _dt: f64) -> f64 {
        0.0
    }
}

/// Lineares Gesetz `q = q0 + k·dt` (k in Rate pro Tag).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    pub q0: f64,
    pub k: f64,
}

impl DeclineLaw for Linear {
    fn rate(&self, dt: f64) -> f64 {
        self.q0 + self.k * dt
    }

    fn derivative(&self, _dt: f64) -> f64 {
        self.k
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        if self.k == 0.0 {
            return None;
        }
        valid_time((q - self.q0) / self.k)
    }

    fn volume(&self, dt: f64) -> f64 {
        self.q0 * dt + 0.5 * self.k * dt * dt
    }
}
