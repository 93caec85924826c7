//! Application-Layer: Controller, State, Events und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod history;
mod intent_mapping;
pub mod render_scene;
pub mod session;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Kette, Selektion, Sperre, Sitzung).
pub mod state;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use history::{EditHistory, Snapshot};
pub use render_scene::build as build_render_scene;
pub use session::{
    InteractiveSession, KeyCombo, SessionError, SessionEvent, SessionPhase, SessionTiming,
    StepCommand, StepKey, StepTarget,
};
pub use state::{AppState, SelectionState, UiState, ViewState};
