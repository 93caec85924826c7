//! Application Controller für zentrale Event-Verarbeitung.

use super::render_scene;
use super::{AppCommand, AppIntent, AppState};
use crate::shared::CurveScene;

/// Orchestriert UI-Events und Use-Cases auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Datei-I/O ===
            AppCommand::LoadFile { path } => handlers::file_io::load(state, path)?,
            AppCommand::SaveFile { path } => handlers::file_io::save(state, path)?,
            AppCommand::NewChain { relative_time } => {
                handlers::file_io::new_chain(state, relative_time)
            }

            // === Selektion ===
            AppCommand::SelectSegment { index } => handlers::selection::select(state, index),

            // === Editing ===
            AppCommand::EditParameter { param, value } => {
                handlers::editing::edit_parameter(state, param, value)
            }
            AppCommand::ToggleLock { param } => handlers::editing::toggle_lock(state, param),
            AppCommand::Anchor { direction } => handlers::editing::anchor(state, direction),
            AppCommand::Connect { direction } => handlers::editing::connect(state, direction),
            AppCommand::MatchSlope => handlers::editing::match_slope(state),
            AppCommand::AddSegment {
                segment_type,
                at_end,
            } => handlers::editing::add_segment(state, segment_type, at_end),
            AppCommand::RemoveSelectedSegment => handlers::editing::remove_selected(state),

            // === Terminierung ===
            AppCommand::SetTerminationInput { input } => {
                handlers::editing::set_termination_input(state, input)
            }
            AppCommand::ApplyTermination => handlers::editing::apply_termination(state),
            AppCommand::SetEndCriterion { criterion } => {
                handlers::editing::set_end_criterion(state, criterion)
            }

            // === Tastatur-Sitzung ===
            AppCommand::BeginStep { combo, now } => handlers::session::begin(state, combo, now),
            AppCommand::EndStep { now } => handlers::session::end(state, now),
            AppCommand::PollSession { now } => handlers::session::poll(state, now),
            AppCommand::CancelSession => handlers::session::cancel(state),

            // === Optionen & Anwendungssteuerung ===
            AppCommand::ApplyOptions { options } => {
                handlers::dialog::apply_options(state, options)?
            }
            AppCommand::ResetOptions => handlers::dialog::reset_options(state)?,
            AppCommand::RequestExit => handlers::dialog::request_exit(state),

            // === History ===
            AppCommand::Undo => handlers::history::undo(state),
            AppCommand::Redo => handlers::history::redo(state),
        }

        Ok(())
    }

    /// Baut die Render-Szene aus dem aktuellen AppState.
    pub fn build_render_scene(&self, state: &AppState) -> CurveScene {
        render_scene::build(state)
    }
}
