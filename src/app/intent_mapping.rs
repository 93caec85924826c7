//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    let has_selection = state.selected_segment().is_some();

    match intent {
        AppIntent::FileSelected { path } => vec![AppCommand::LoadFile { path }],
        AppIntent::SaveRequested => vec![AppCommand::SaveFile { path: None }],
        AppIntent::SaveFilePathSelected { path } => vec![AppCommand::SaveFile { path: Some(path) }],
        AppIntent::NewChainRequested { relative_time } => {
            vec![AppCommand::NewChain { relative_time }]
        }
        AppIntent::ExitRequested => vec![AppCommand::RequestExit],

        AppIntent::SegmentSelected { index } => {
            if index < state.chain.len() {
                vec![AppCommand::SelectSegment { index }]
            } else {
                log::debug!("Selektion ignoriert: Segment {} existiert nicht", index);
                vec![]
            }
        }

        AppIntent::ParameterEditRequested { param, value } if has_selection => {
            vec![AppCommand::EditParameter { param, value }]
        }
        AppIntent::ToggleLockRequested { param } if has_selection => {
            vec![AppCommand::ToggleLock { param }]
        }
        AppIntent::AnchorRequested { direction } if has_selection => {
            vec![AppCommand::Anchor { direction }]
        }
        AppIntent::ConnectRequested { direction } if has_selection => {
            vec![AppCommand::Connect { direction }]
        }
        AppIntent::MatchSlopeRequested if has_selection => vec![AppCommand::MatchSlope],
        AppIntent::RemoveSelectedSegmentRequested if has_selection => {
            vec![AppCommand::RemoveSelectedSegment]
        }
        AppIntent::ParameterEditRequested { .. }
        | AppIntent::ToggleLockRequested { .. }
        | AppIntent::AnchorRequested { .. }
        | AppIntent::ConnectRequested { .. }
        | AppIntent::MatchSlopeRequested
        | AppIntent::RemoveSelectedSegmentRequested => {
            log::debug!("Kein Segment selektiert, Intent ignoriert");
            vec![]
        }

        AppIntent::AddSegmentRequested {
            segment_type,
            at_end,
        } => vec![AppCommand::AddSegment {
            segment_type,
            at_end,
        }],

        AppIntent::TerminationInputChanged { input } => {
            vec![AppCommand::SetTerminationInput { input }]
        }
        AppIntent::ApplyTerminationRequested => vec![AppCommand::ApplyTermination],
        AppIntent::EndCriterionChanged { criterion } => {
            vec![AppCommand::SetEndCriterion { criterion }]
        }

        AppIntent::UndoRequested => vec![AppCommand::Undo],
        AppIntent::RedoRequested => vec![AppCommand::Redo],

        AppIntent::StepKeyPressed { combo, now } => vec![AppCommand::BeginStep { combo, now }],
        AppIntent::StepKeyReleased { now } => vec![AppCommand::EndStep { now }],
        AppIntent::SessionTick { now } => {
            if state.session.is_idle() {
                vec![]
            } else {
                vec![AppCommand::PollSession { now }]
            }
        }
        AppIntent::InputBlurred => vec![AppCommand::CancelSession],

        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],
        AppIntent::ResetOptionsRequested => vec![AppCommand::ResetOptions],
    }
}
