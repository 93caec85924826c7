//! Zentrale Konfiguration für den Decline-Curve-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::{RateBasis, SegmentDefaults};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Kette ───────────────────────────────────────────────────────────

/// Maximale Anzahl Segmente pro Kette.
pub const MAX_SEGMENTS: usize = 10;
/// Anzahl Segmente, die beim Entfernen immer erhalten bleibt.
pub const MIN_SEGMENTS: usize = 1;

// ── History ─────────────────────────────────────────────────────────

/// Maximale Undo-Tiefe.
pub const HISTORY_DEPTH: usize = 200;

// ── Neue Segmente ───────────────────────────────────────────────────

/// Standard-Dauer neuer Segmente in Tagen.
pub const DEFAULT_SEGMENT_DURATION: i64 = 365;
/// Standard-Startrate, wenn kein Nachbar einen Wert liefert.
pub const DEFAULT_Q_START: f64 = 100.0;
/// Standard-Decline (effektiv, jährlich) fallender Typen.
pub const DEFAULT_D_EFF: f64 = 0.3;
/// Standard-Decline von `exp_inc` (negativ = Anstieg).
pub const DEFAULT_D_EFF_INC: f64 = -0.1;
/// Standard-b-Faktor.
pub const DEFAULT_B: f64 = 1.0;
/// Standard-Umschalt-Decline von `arps_modified`.
pub const DEFAULT_TARGET_D_EFF_SW: f64 = 0.06;

// ── Tastatur-Sitzung ────────────────────────────────────────────────

/// Abstand zwischen zwei Schritten einer gehaltenen Taste.
pub const KEY_TICK_INTERVAL_MS: u64 = 50;
/// Haltedauer pro Beschleunigungsstufe.
pub const KEY_ACCEL_INTERVAL_MS: u64 = 400;
/// Maximale Schrittweite (Tage bzw. Vielfache von `q_step_fraction`).
pub const KEY_MAX_STEP: i64 = 30;
/// Ruhezeit nach Loslassen bis zum Commit.
pub const COMMIT_DEBOUNCE_MS: u64 = 300;
/// Relative Rate-Änderung pro Schritt.
pub const Q_STEP_FRACTION: f64 = 0.01;

// ── Darstellung ─────────────────────────────────────────────────────

/// Stützstellen pro Segment in der Render-Szene.
pub const RENDER_SAMPLES_PER_SEGMENT: usize = 32;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `decline_curve_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Kette ───────────────────────────────────────────────────
    /// Maximale Anzahl Segmente
    pub max_segments: usize,
    /// Mindestanzahl Segmente beim Entfernen (0 = Kette darf leer werden)
    pub min_segments: usize,
    /// Undo-Tiefe
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    // ── Neue Segmente ───────────────────────────────────────────
    pub default_segment_duration: i64,
    pub default_q_start: f64,
    pub default_d_eff: f64,
    pub default_d_eff_inc: f64,
    pub default_b: f64,
    #[serde(default)]
    pub default_k: f64,
    pub default_target_d_eff_sw: f64,

    // ── Tastatur-Sitzung ────────────────────────────────────────
    pub key_tick_interval_ms: u64,
    pub key_accel_interval_ms: u64,
    pub key_max_step: i64,
    pub commit_debounce_ms: u64,
    #[serde(default = "default_q_step_fraction")]
    pub q_step_fraction: f64,

    // ── Einheiten ───────────────────────────────────────────────
    /// Zeitbasis angezeigter Raten
    #[serde(default)]
    pub rate_basis: RateBasis,
    /// Datum des Index 0
    #[serde(default = "default_epoch")]
    pub epoch: NaiveDate,

    // ── Darstellung ─────────────────────────────────────────────
    #[serde(default = "default_render_samples")]
    pub render_samples_per_segment: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            max_segments: MAX_SEGMENTS,
            min_segments: MIN_SEGMENTS,
            history_depth: HISTORY_DEPTH,

            default_segment_duration: DEFAULT_SEGMENT_DURATION,
            default_q_start: DEFAULT_Q_START,
            default_d_eff: DEFAULT_D_EFF,
            default_d_eff_inc: DEFAULT_D_EFF_INC,
            default_b: DEFAULT_B,
            default_k: 0.0,
            default_target_d_eff_sw: DEFAULT_TARGET_D_EFF_SW,

            key_tick_interval_ms: KEY_TICK_INTERVAL_MS,
            key_accel_interval_ms: KEY_ACCEL_INTERVAL_MS,
            key_max_step: KEY_MAX_STEP,
            commit_debounce_ms: COMMIT_DEBOUNCE_MS,
            q_step_fraction: Q_STEP_FRACTION,

            rate_basis: RateBasis::Day,
            epoch: default_epoch(),

            render_samples_per_segment: RENDER_SAMPLES_PER_SEGMENT,
        }
    }
}

/// Serde-Default für `history_depth` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_history_depth() -> usize {
    HISTORY_DEPTH
}

fn default_q_step_fraction() -> f64 {
    Q_STEP_FRACTION
}

fn default_epoch() -> NaiveDate {
    crate::core::DomainAxis::default_epoch()
}

fn default_render_samples() -> usize {
    RENDER_SAMPLES_PER_SEGMENT
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("decline_curve_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("decline_curve_editor.toml")
    }

    /// Startwerte für neu eingefügte Segmente.
    pub fn segment_defaults(&self) -> SegmentDefaults {
        SegmentDefaults {
            duration: self.default_segment_duration,
            q_start: self.default_q_start,
            d_eff: self.default_d_eff,
            d_eff_inc: self.default_d_eff_inc,
            b: self.default_b,
            k: self.default_k,
            target_d_eff_sw: self.default_target_d_eff_sw,
        }
    }

    pub fn key_tick_interval(&self) -> Duration {
        Duration::from_millis(self.key_tick_interval_ms.max(1))
    }

    pub fn key_accel_interval(&self) -> Duration {
        Duration::from_millis(self.key_accel_interval_ms.max(1))
    }

    pub fn commit_debounce(&self) -> Duration {
        Duration::from_millis(self.commit_debounce_ms)
    }
}
