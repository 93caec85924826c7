//! Umrechnung zwischen effektiver (jährlicher) und nominaler Decline-Rate.

use super::B_EPSILON;

/// Tage pro Jahr für die Umrechnung jährlicher Raten auf den Tagesindex.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Nominale Jahresrate aus effektivem Decline (Exponential): `D = -ln(1 - D_eff)`.
///
/// Negative `d_eff` ergeben ein negatives `D` (Anstieg).
pub fn nominal_from_effective_exp(d_eff: f64) -> f64 {
    -(1.0 - d_eff).ln()
}

/// Effektiver Decline aus nominaler Jahresrate (Exponential).
pub fn effective_from_nominal_exp(d_nominal: f64) -> f64 {
    1.0 - (-d_nominal).exp()
}

/// Nominale Jahresrate aus effektivem Sekanten-Decline (Arps).
///
/// `D = ((1 - D_eff)^(-b) - 1) / b`, für `b → 0` das Exponentialgesetz.
pub fn nominal_from_effective_secant(d_eff: f64, b: f64) -> f64 {
    if b < B_EPSILON {
        return nominal_from_effective_exp(d_eff);
    }
    ((1.0 - d_eff).powf(-b) - 1.0) / b
}

/// Effektiver Sekanten-Decline aus nominaler Jahresrate (Arps).
pub fn effective_from_nominal_secant(d_nominal: f64, b: f64) -> f64 {
    if b < B_EPSILON {
        return effective_from_nominal_exp(d_nominal);
    }
    1.0 - (1.0 + b * d_nominal).powf(-1.0 / b)
}

/// Jahresrate → Tagesrate.
#[inline]
pub fn per_day(d_nominal_per_year: f64) -> f64 {
    d_nominal_per_year / DAYS_PER_YEAR
}

/// Tagesrate → Jahresrate.
#[inline]
pub fn per_year(d_nominal_per_day: f64) -> f64 {
    d_nominal_per_day * DAYS_PER_YEAR
}
