use super::{valid_time, DeclineLaw, Exponential, B_EPSILON};

/// Hyperbolisches Arps-Gesetz `q = q0 / (1 + b·d·dt)^(1/b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arps {
    pub q0: f64,
    /// Nominale Anfangs-Decline-Rate pro Tag
    pub d: f64,
    pub b: f64,
}

impl Arps {
    /// Für `b → 0` degeneriert Arps zum Exponentialgesetz.
    fn degenerate(&self) -> Option<Exponential> {
        (self.b < B_EPSILON).then_some(Exponential {
            q0: self.q0,
            d: self.d,
        })
    }

    #[inline]
    fn base(&self, dt: f64) -> f64 {
        1.0 + self.b * self.d * dt
    }

    /// Momentane nominale Decline-Rate `d / (1 + b·d·dt)`.
    pub fn instantaneous_decline(&self, dt: f64) -> f64 {
        if self.b < B_EPSILON {
            return self.d;
        }
        self.d / self.base(dt)
    }
}

impl DeclineLaw for Arps {
    fn rate(&self, dt: f64) -> f64 {
        if let Some(exp) = self.degenerate() {
            return exp.rate(dt);
        }
        self.q0 * self.base(dt).powf(-1.0 / self.b)
    }

    fn derivative(&self, dt: f64) -> f64 {
        if let Some(exp) = self.degenerate() {
            return exp.derivative(dt);
        }
        -self.d * self.q0 * self.base(dt).powf(-1.0 / self.b - 1.0)
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        if let Some(exp) = self.degenerate() {
            return exp.time_to_rate(q);
        }
        if self.d <= 0.0 || q <= 0.0 || self.q0 <= 0.0 {
            return None;
        }
        valid_time(((self.q0 / q).powf(self.b) - 1.0) / (self.b * self.d))
    }

    fn volume(&self, dt: f64) -> f64 {
        if let Some(exp) = self.degenerate() {
            return exp.volume(dt);
        }
        if self.d.abs() < 1e-12 {
            return self.q0 * dt;
        }
        if (self.b - 1.0).abs() < B_EPSILON {
            return self.q0 / self.d * self.base(dt).ln();
        }
        self.q0 / (self.d * (1.0 - self.b)) * (1.0 - self.base(dt).powf(1.0 - 1.0 / self.b))
    }
}
