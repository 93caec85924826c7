use super::{Arps, DeclineLaw, Exponential, B_EPSILON};

/// Modifiziertes Arps-Gesetz: hyperbolisch bis die momentane Decline-Rate
/// `d_sw` erreicht, danach exponentiell mit `d_sw`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifiedArps {
    pub q0: f64,
    /// Nominale Anfangs-Decline-Rate pro Tag
    pub d_i: f64,
    pub b: f64,
    /// Nominale Umschalt-Decline-Rate pro Tag
    pub d_sw: f64,
}

impl ModifiedArps {
    fn hyperbolic(&self) -> Arps {
        Arps {
            q0: self.q0,
            d: self.d_i,
            b: self.b,
        }
    }

    /// Umschaltzeitpunkt `dt_sw = (d_i/d_sw - 1) / (b·d_i)`.
    ///
    /// `None`, wenn das Segment von Beginn an exponentiell mit `d_i` verläuft
    /// (`b ≈ 0` oder `d_i ≤ d_sw`).
    pub fn switch_time(&self) -> Option<f64> {
        if self.b < B_EPSILON || self.d_sw <= 0.0 || self.d_i <= self.d_sw {
            return None;
        }
        Some((self.d_i / self.d_sw - 1.0) / (self.b * self.d_i))
    }

    /// Rate am Umschaltpunkt.
    pub fn switch_rate(&self) -> Option<f64> {
        self.switch_time().map(|t| self.hyperbolic().rate(t))
    }

    fn tail(&self, t_sw: f64) -> Exponential {
        Exponential {
            q0: self.hyperbolic().rate(t_sw),
            d: self.d_sw,
        }
    }

    fn pure_exponential(&self) -> Exponential {
        Exponential {
            q0: self.q0,
            d: self.d_i,
        }
    }
}

impl DeclineLaw for ModifiedArps {
    fn rate(&self, dt: f64) -> f64 {
        match self.switch_time() {
            None => self.pure_exponential().rate(dt),
            Some(t_sw) if dt <= t_sw => self.hyperbolic().rate(dt),
            Some(t_sw) => self.tail(t_sw).rate(dt - t_sw),
        }
    }

    fn derivative(&self, dt: f64) -> f64 {
        match self.switch_time() {
            None => self.pure_exponential().derivative(dt),
            Some(t_sw) if dt <= t_sw => self.hyperbolic().derivative(dt),
            Some(t_sw) => self.tail(t_sw).derivative(dt - t_sw),
        }
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        let Some(t_sw) = self.switch_time() else {
            return self.pure_exponential().time_to_rate(q);
        };
        let tail = self.tail(t_sw);
        if q >= tail.q0 {
            self.hyperbolic().time_to_rate(q)
        } else {
            tail.time_to_rate(q).map(|t| t_sw + t)
        }
    }

    fn volume(&self, dt: f64) -> f64 {
        match self.switch_time() {
            None => self.pure_exponential().volume(dt),
            Some(t_sw) if dt <= t_sw => self.hyperbolic().volume(dt),
            Some(t_sw) => self.hyperbolic().volume(t_sw) + self.tail(t_sw).volume(dt - t_sw),
        }
    }
}
