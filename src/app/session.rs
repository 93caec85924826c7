//! Interaktive Tastatur-Sitzung: gehaltene Tasten mit Beschleunigung und
//! verzögertem Commit.
//!
//! Zustände: `Idle → Armed → Committing → Idle`. Die Sitzung besitzt keine
//! eigene Uhr; der Host treibt sie über `press`/`release`/`poll` mit
//! expliziten Zeitstempeln.

use std::fmt;
use std::time::{Duration, Instant};

/// Pfeiltaste einer Schritt-Eingabe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKey {
    Up,
    Down,
    Left,
    Right,
}

/// Pfeiltaste plus Modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: StepKey,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyCombo {
    /// Pfeiltaste ohne Modifier.
    pub fn plain(key: StepKey) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Strg+")?;
        }
        if self.shift {
            f.write_str("Umschalt+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        write!(f, "{:?}", self.key)
    }
}

/// Ziel eines Schritts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTarget {
    /// Endindex des selektierten Segments
    EndIdx,
    /// Startindex des selektierten Segments
    StartIdx,
    /// Alle Segmente zeitlich verschieben
    AllDates,
    /// Startrate des selektierten Segments
    QStart,
    /// Startraten aller Segmente skalieren
    AllQStarts,
}

impl StepTarget {
    /// Bulk-Ziele wirken auf die gesamte Kette.
    pub fn is_bulk(self) -> bool {
        matches!(self, StepTarget::AllDates | StepTarget::AllQStarts)
    }
}

/// Aufgelöster Tastenbefehl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCommand {
    pub target: StepTarget,
    /// +1 oder -1
    pub direction: i64,
}

/// Abgewiesene Tasteneingabe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Ungültige Tastenkombination: {0}")]
    InvalidKeyCombination(KeyCombo),
}

/// Ereignis für den Host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Einen Schritt der Größe `amount` anwenden
    Step { command: StepCommand, amount: i64 },
    /// Gesammelte Schritte als eine Änderung übernehmen
    Commit,
}

/// Phase der Sitzung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Armed { command: StepCommand, since: Instant },
    Committing { released_at: Instant },
}

/// Zeitparameter der Sitzung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub tick_interval: Duration,
    pub accel_interval: Duration,
    pub max_step: i64,
    pub debounce: Duration,
}

impl SessionTiming {
    pub fn from_options(options: &crate::shared::EditorOptions) -> Self {
        Self {
            tick_interval: options.key_tick_interval(),
            accel_interval: options.key_accel_interval(),
            max_step: options.key_max_step.max(1),
            debounce: options.commit_debounce(),
        }
    }
}

/// Ordnet eine Tastenkombination ihrem Befehl zu.
///
/// Strg wählt die Bulk-Variante und unterdrückt damit das Einzelziel;
/// Alt sowie Strg+Umschalt sind ungültig.
pub fn resolve_combo(combo: KeyCombo) -> Result<StepCommand, SessionError> {
    let invalid = Err(SessionError::InvalidKeyCombination(combo));
    if combo.alt || (combo.ctrl && combo.shift) {
        return invalid;
    }
    let (target, direction) = match combo.key {
        StepKey::Left | StepKey::Right => {
            let direction = if combo.key == StepKey::Right { 1 } else { -1 };
            let target = if combo.ctrl {
                StepTarget::AllDates
            } else if combo.shift {
                StepTarget::StartIdx
            } else {
                StepTarget::EndIdx
            };
            (target, direction)
        }
        StepKey::Up | StepKey::Down => {
            if combo.shift {
                return invalid;
            }
            let direction = if combo.key == StepKey::Up { 1 } else { -1 };
            let target = if combo.ctrl {
                StepTarget::AllQStarts
            } else {
                StepTarget::QStart
            };
            (target, direction)
        }
    };
    Ok(StepCommand { target, direction })
}

/// Zustandsautomat einer gehaltenen Taste.
#[derive(Debug, Clone)]
pub struct InteractiveSession {
    phase: SessionPhase,
    acceleration_level: i64,
    last_tick: Option<Instant>,
    timing: SessionTiming,
    /// Seit dem letzten Commit wurden Schritte angewendet
    dirty: bool,
}

impl InteractiveSession {
    pub fn new(timing: SessionTiming) -> Self {
        Self {
            phase: SessionPhase::Idle,
            acceleration_level: 1,
            last_tick: None,
            timing,
            dirty: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn acceleration_level(&self) -> i64 {
        self.acceleration_level
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SessionPhase::Idle
    }

    pub fn has_pending_steps(&self) -> bool {
        self.dirty
    }

    pub fn set_timing(&mut self, timing: SessionTiming) {
        self.timing = timing;
    }

    /// Taste gedrückt: liefert den ersten Schritt sofort.
    pub fn press(&mut self, combo: KeyCombo, now: Instant) -> Result<SessionEvent, SessionError> {
        let command = resolve_combo(combo)?;
        self.phase = SessionPhase::Armed {
            command,
            since: now,
        };
        self.acceleration_level = 1;
        self.last_tick = Some(now);
        Ok(SessionEvent::Step { command, amount: 1 })
    }

    /// Taste losgelassen: Beschleunigung zurücksetzen, Debounce starten.
    pub fn release(&mut self, now: Instant) {
        if let SessionPhase::Armed { .. } = self.phase {
            self.phase = SessionPhase::Committing { released_at: now };
            self.acceleration_level = 1;
            self.last_tick = None;
        }
    }

    /// Treibt die Sitzung voran.
    ///
    /// `Armed`: höchstens ein Schritt pro Tick-Intervall, Schrittweite wächst
    /// mit der Haltedauer bis `max_step`. `Committing`: nach Ablauf der
    /// Ruhezeit `Commit`, sofern Schritte angewendet wurden.
    pub fn poll(&mut self, now: Instant) -> Option<SessionEvent> {
        match self.phase {
            SessionPhase::Idle => None,
            SessionPhase::Armed { command, since } => {
                let last = self.last_tick.unwrap_or(since);
                if now.saturating_duration_since(last) < self.timing.tick_interval {
                    return None;
                }
                let held = now.saturating_duration_since(since);
                let level = 1 + (held.as_millis() / self.timing.accel_interval.as_millis().max(1))
                    as i64;
                self.acceleration_level = level.min(self.timing.max_step);
                self.last_tick = Some(now);
                Some(SessionEvent::Step {
                    command,
                    amount: self.acceleration_level,
                })
            }
            SessionPhase::Committing { released_at } => {
                if now.saturating_duration_since(released_at) < self.timing.debounce {
                    return None;
                }
                self.phase = SessionPhase::Idle;
                self.take_commit()
            }
        }
    }

    /// Bricht die Beschleunigung ab; bereits angewendete Schritte werden
    /// sofort übernommen.
    pub fn cancel(&mut self) -> Option<SessionEvent> {
        self.phase = SessionPhase::Idle;
        self.acceleration_level = 1;
        self.last_tick = None;
        self.take_commit()
    }

    /// Meldet, dass ein Schritt tatsächlich angewendet wurde.
    pub fn note_step_applied(&mut self) {
        self.dirty = true;
    }

    fn take_commit(&mut self) -> Option<SessionEvent> {
        std::mem::take(&mut self.dirty).then_some(SessionEvent::Commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> SessionTiming {
        SessionTiming {
            tick_interval: Duration::from_millis(50),
            accel_interval: Duration::from_millis(400),
            max_step: 5,
            debounce: Duration::from_millis(300),
        }
    }

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_combo_mapping() {
        let right = resolve_combo(KeyCombo::plain(StepKey::Right)).expect("gültig");
        assert_eq!(right.target, StepTarget::EndIdx);
        assert_eq!(right.direction, 1);

        let shift_left =
            resolve_combo(KeyCombo::plain(StepKey::Left).with_shift()).expect("gültig");
        assert_eq!(shift_left.target, StepTarget::StartIdx);
        assert_eq!(shift_left.direction, -1);

        let ctrl_right =
            resolve_combo(KeyCombo::plain(StepKey::Right).with_ctrl()).expect("gültig");
        assert_eq!(ctrl_right.target, StepTarget::AllDates, "Bulk unterdrückt Einzelziel");

        let ctrl_down = resolve_combo(KeyCombo::plain(StepKey::Down).with_ctrl()).expect("gültig");
        assert_eq!(ctrl_down.target, StepTarget::AllQStarts);
    }

    #[test]
    fn test_invalid_combos_are_rejected() {
        for combo in [
            KeyCombo::plain(StepKey::Right).with_ctrl().with_shift(),
            KeyCombo::plain(StepKey::Up).with_alt(),
            KeyCombo::plain(StepKey::Up).with_shift(),
        ] {
            assert_eq!(
                resolve_combo(combo),
                Err(SessionError::InvalidKeyCombination(combo))
            );
        }
        let mut session = InteractiveSession::new(timing());
        let now = Instant::now();
        assert!(session
            .press(KeyCombo::plain(StepKey::Left).with_alt(), now)
            .is_err());
        assert!(session.is_idle());
    }

    #[test]
    fn test_press_emits_first_step_and_arms() {
        let mut session = InteractiveSession::new(timing());
        let now = Instant::now();
        let event = session
            .press(KeyCombo::plain(StepKey::Right), now)
            .expect("gültig");
        assert!(matches!(event, SessionEvent::Step { amount: 1, .. }));
        assert!(matches!(session.phase(), SessionPhase::Armed { .. }));
    }

    #[test]
    fn test_ticks_respect_interval_and_accelerate() {
        let mut session = InteractiveSession::new(timing());
        let t0 = Instant::now();
        session
            .press(KeyCombo::plain(StepKey::Right), t0)
            .expect("gültig");

        assert_eq!(session.poll(ms(t0, 20)), None, "vor Tick-Intervall");
        assert!(matches!(
            session.poll(ms(t0, 50)),
            Some(SessionEvent::Step { amount: 1, .. })
        ));
        assert!(matches!(
            session.poll(ms(t0, 850)),
            Some(SessionEvent::Step { amount: 3, .. })
        ));
        assert!(matches!(
            session.poll(ms(t0, 10_000)),
            Some(SessionEvent::Step { amount: 5, .. })
        ), "Schrittweite begrenzt");
    }

    #[test]
    fn test_release_resets_acceleration_and_commits_after_debounce() {
        let mut session = InteractiveSession::new(timing());
        let t0 = Instant::now();
        session
            .press(KeyCombo::plain(StepKey::Up), t0)
            .expect("gültig");
        session.note_step_applied();
        session.poll(ms(t0, 2000));
        session.note_step_applied();
        assert!(session.acceleration_level() > 1);

        session.release(ms(t0, 2000));
        assert_eq!(session.acceleration_level(), 1);
        assert_eq!(session.poll(ms(t0, 2100)), None, "Ruhezeit läuft");
        assert_eq!(session.poll(ms(t0, 2300)), Some(SessionEvent::Commit));
        assert!(session.is_idle());
        assert_eq!(session.poll(ms(t0, 5000)), None, "nur ein Commit");
    }

    #[test]
    fn test_no_commit_without_applied_steps() {
        let mut session = InteractiveSession::new(timing());
        let t0 = Instant::now();
        session
            .press(KeyCombo::plain(StepKey::Left), t0)
            .expect("gültig");
        session.release(ms(t0, 10));
        assert_eq!(session.poll(ms(t0, 1000)), None);
        assert!(session.is_idle());
    }

    #[test]
    fn test_press_during_debounce_coalesces_commit() {
        let mut session = InteractiveSession::new(timing());
        let t0 = Instant::now();
        session
            .press(KeyCombo::plain(StepKey::Right), t0)
            .expect("gültig");
        session.note_step_applied();
        session.release(ms(t0, 100));
        session
            .press(KeyCombo::plain(StepKey::Right), ms(t0, 200))
            .expect("gültig");
        assert_eq!(session.poll(ms(t0, 500)).map(|_| ()), Some(()), "weiterer Schritt");
        session.release(ms(t0, 600));
        assert_eq!(session.poll(ms(t0, 950)), Some(SessionEvent::Commit));
    }

    #[test]
    fn test_cancel_flushes_applied_steps() {
        let mut session = InteractiveSession::new(timing());
        let t0 = Instant::now();
        session
            .press(KeyCombo::plain(StepKey::Right), t0)
            .expect("gültig");
        session.note_step_applied();
        assert_eq!(session.cancel(), Some(SessionEvent::Commit));
        assert!(session.is_idle());
        assert_eq!(session.cancel(), None);
    }
}
