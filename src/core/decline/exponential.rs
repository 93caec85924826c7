use super::{valid_time, DeclineLaw};

/// Exponentialgesetz `q = q0·e^(-d·dt)`.
///
/// `d` ist die nominale Tagesrate; negativ für ansteigende Segmente.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    pub q0: f64,
    pub d: f64,
}

impl DeclineLaw for Exponential {
    fn rate(&self, dt: f64) -> f64 {
        self.q0 * (-self.d * dt).exp()
    }

    fn derivative(&self, dt: f64) -> f64 {
        -self.d * self.rate(dt)
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        if self.d == 0.0 || q <= 0.0 || self.q0 <= 0.0 {
            return None;
        }
        valid_time((self.q0 / q).ln() / self.d)
    }

    fn volume(&self, dt: f64) -> f64 {
        if self.d.abs() < 1e-12 {
            return self.q0 * dt;
        }
        self.q0 * (1.0 - (-self.d * dt).exp()) / self.d
    }
}
