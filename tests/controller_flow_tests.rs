use approx::assert_relative_eq;
use decline_curve_editor::{AppCommand, AppController, AppIntent, AppState};
use decline_curve_editor::{
    Direction, EndCriterion, LifeUnit, QFinalDict, SegmentParam, SegmentType, ViewValue,
    WellLifeMethod,
};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/simple_chain.json"
    ))
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "decline_curve_editor_{}_{}.json",
        name,
        std::process::id()
    ))
}

fn loaded_state(controller: &mut AppController) -> AppState {
    let mut state = AppState::new();
    controller
        .handle_intent(&mut state, AppIntent::FileSelected { path: fixture_path() })
        .expect("Fixture sollte ladbar sein");
    state
}

/// Relative Kette mit einem `exp_dec`-Segment 0..=364 (q_start 100, D_eff 30 %).
fn relative_state(controller: &mut AppController) -> AppState {
    let mut state = AppState::new();
    controller
        .handle_intent(&mut state, AppIntent::NewChainRequested { relative_time: true })
        .expect("neue Kette");
    controller
        .handle_intent(
            &mut state,
            AppIntent::AddSegmentRequested {
                segment_type: SegmentType::ExpDec,
                at_end: true,
            },
        )
        .expect("Segment anfügbar");
    state
}

fn edit(controller: &mut AppController, state: &mut AppState, param: SegmentParam, value: f64) {
    controller
        .handle_intent(
            state,
            AppIntent::ParameterEditRequested {
                param,
                value: ViewValue::Number(value),
            },
        )
        .expect("Parameteränderung sollte ohne Fehler durchlaufen");
}

fn select(controller: &mut AppController, state: &mut AppState, index: usize) {
    controller
        .handle_intent(state, AppIntent::SegmentSelected { index })
        .expect("Selektion");
}

// ─── Anwendungssteuerung ─────────────────────────────────────────────

#[test]
fn test_save_requested_without_path_opens_dialog_and_logs_command() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    controller
        .handle_intent(&mut state, AppIntent::SaveRequested)
        .expect("SaveRequested sollte ohne Fehler durchlaufen");

    assert!(state.ui.show_save_file_dialog);
    let last = state
        .command_log
        .entries()
        .last()
        .expect("Es sollte ein Command geloggt sein");

    match last {
        AppCommand::SaveFile { path } => assert!(path.is_none()),
        other => panic!("Unerwarteter letzter Command: {other:?}"),
    }
}

#[test]
fn test_exit_requested_sets_exit_flag_and_logs_command() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    assert!(!state.should_exit);

    controller
        .handle_intent(&mut state, AppIntent::ExitRequested)
        .expect("ExitRequested sollte ohne Fehler durchlaufen");

    assert!(state.should_exit);
    match state.command_log.entries().last() {
        Some(AppCommand::RequestExit) => {}
        other => panic!("Unerwarteter letzter Command: {other:?}"),
    }
}

// ─── Laden ───────────────────────────────────────────────────────────

#[test]
fn test_load_fixture_selects_first_segment_with_default_lock() {
    let mut controller = AppController::new();
    let state = loaded_state(&mut controller);

    assert_eq!(state.chain.len(), 3);
    assert!(state.chain.is_contiguous());
    assert!(!state.chain.relative_time());
    assert_eq!(state.selection.selected_segment, Some(0));
    assert_eq!(state.lock.locked(), Some(SegmentParam::EndIdx));
    assert_eq!(state.ui.current_file_path, Some(fixture_path()));
    assert!(!state.can_undo(), "Laden erzeugt keinen Undo-Schritt");
    assert!(state.view.render_revision > 0);
}

#[test]
fn test_load_missing_file_returns_error() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    let result = controller.handle_intent(
        &mut state,
        AppIntent::FileSelected {
            path: temp_path("gibt_es_nicht"),
        },
    );

    assert!(result.is_err());
    assert!(state.chain.is_empty());
}

// ─── Parameter ───────────────────────────────────────────────────────

#[test]
fn test_q_start_edit_is_undoable_and_redoable() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    let original = state.chain.segments()[0];

    edit(&mut controller, &mut state, SegmentParam::QStart, 400.0);

    let edited = state.chain.segments()[0];
    assert_relative_eq!(edited.q_start().expect("Rate"), 400.0);
    assert_eq!(edited.start_idx(), original.start_idx());
    assert_eq!(edited.end_idx(), original.end_idx());
    assert!(edited.q_end() < original.q_end(), "q_end folgt der Form");

    controller
        .handle_intent(&mut state, AppIntent::UndoRequested)
        .expect("Undo");
    assert_eq!(state.chain.segments()[0], original);

    controller
        .handle_intent(&mut state, AppIntent::RedoRequested)
        .expect("Redo");
    assert_eq!(state.chain.segments()[0], edited);
}

#[test]
fn test_out_of_range_value_is_clamped_with_status_message() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);

    // D_eff in Prozent
    edit(&mut controller, &mut state, SegmentParam::DEff, 150.0);

    assert_relative_eq!(state.chain.segments()[0].d_eff().expect("D_eff"), 0.99);
    let message = state.ui.status_message.as_deref().expect("Warnung erwartet");
    assert!(message.contains("D_eff"), "Meldung: {message}");
    assert!(state.can_undo());
}

#[test]
fn test_duration_edit_keeps_chain_contiguous() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    select(&mut controller, &mut state, 1);
    let end_before = state.chain.segments()[1].end_idx();

    edit(&mut controller, &mut state, SegmentParam::Duration, 100.0);

    let middle = state.chain.segments()[1];
    assert_eq!(middle.duration(), 100);
    assert_eq!(middle.end_idx(), end_before, "Ende gesperrt, Start wandert");
    assert!(state.chain.is_contiguous());
    assert_eq!(
        state.chain.segments()[0].end_idx() + 1,
        middle.start_idx(),
        "Vorgänger wird nachgeführt"
    );
}

#[test]
fn test_date_value_in_relative_mode_is_rejected() {
    let mut controller = AppController::new();
    let mut state = relative_state(&mut controller);
    let before = state.chain.clone();
    let undo_before = state.can_undo();

    controller
        .handle_intent(
            &mut state,
            AppIntent::ParameterEditRequested {
                param: SegmentParam::EndIdx,
                value: ViewValue::Date(
                    chrono::NaiveDate::from_ymd_opt(2030, 1, 1).expect("gültiges Datum"),
                ),
            },
        )
        .expect("Ablehnung ist kein Fehler");

    assert_eq!(state.chain, before);
    assert_eq!(state.can_undo(), undo_before);
    assert!(state.ui.status_message.is_some());
}

#[test]
fn test_date_value_in_dated_mode_moves_end() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 30).expect("gültiges Datum");

    controller
        .handle_intent(
            &mut state,
            AppIntent::ParameterEditRequested {
                param: SegmentParam::EndIdx,
                value: ViewValue::Date(date),
            },
        )
        .expect("Datumseingabe");

    let first = state.chain.segments()[0];
    assert_eq!(
        state.units().axis.date_from_idx(first.end_idx()),
        Some(date)
    );
    assert!(state.chain.is_contiguous());
}

#[test]
fn test_toggle_lock_switches_and_releases() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);

    controller
        .handle_intent(
            &mut state,
            AppIntent::ToggleLockRequested {
                param: SegmentParam::DEff,
            },
        )
        .expect("Sperre");
    assert_eq!(state.lock.locked(), Some(SegmentParam::DEff));

    controller
        .handle_intent(
            &mut state,
            AppIntent::ToggleLockRequested {
                param: SegmentParam::DEff,
            },
        )
        .expect("Sperre");
    assert_eq!(state.lock.locked(), None);
}

#[test]
fn test_q_end_lock_holds_end_rate_on_d_eff_edit() {
    let mut controller = AppController::new();
    let mut state = relative_state(&mut controller);
    controller
        .handle_intent(
            &mut state,
            AppIntent::ToggleLockRequested {
                param: SegmentParam::QEnd,
            },
        )
        .expect("Sperre");
    let q_end = state.chain.segments()[0].q_end().expect("q_end");

    edit(&mut controller, &mut state, SegmentParam::DEff, 50.0);

    let segment = state.chain.segments()[0];
    assert_relative_eq!(segment.d_eff().expect("D_eff"), 0.5);
    assert_relative_eq!(
        segment.q_end().expect("q_end"),
        q_end,
        max_relative = 5e-3
    );
    assert!(segment.end_idx() < 364, "höherer Decline erreicht q_end früher");
}

// ─── Grenzoperationen ────────────────────────────────────────────────

#[test]
fn test_anchor_previous_sets_start_to_neighbor_end() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    select(&mut controller, &mut state, 1);
    let previous = state.chain.segments()[0];
    let q_end_before = state.chain.segments()[1].q_end().expect("q_end");

    controller
        .handle_intent(
            &mut state,
            AppIntent::AnchorRequested {
                direction: Direction::Previous,
            },
        )
        .expect("Anchor");

    let current = state.chain.segments()[1];
    assert_relative_eq!(
        current.q_start().expect("q_start"),
        previous.q_end().expect("q_end"),
        max_relative = 1e-9
    );
    assert_relative_eq!(
        current.q_end().expect("q_end"),
        q_end_before,
        max_relative = 1e-4
    );
    assert_eq!(state.chain.segments()[0], previous, "Nachbar unverändert");
}

#[test]
fn test_connect_without_neighbor_is_rejected() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    let before = state.chain.clone();

    controller
        .handle_intent(
            &mut state,
            AppIntent::ConnectRequested {
                direction: Direction::Previous,
            },
        )
        .expect("Ablehnung ist kein Fehler");

    assert_eq!(state.chain, before);
    assert!(state.ui.status_message.is_some());
    assert!(!state.can_undo());
}

#[test]
fn test_match_slope_matches_previous_derivative() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    select(&mut controller, &mut state, 1);

    controller
        .handle_intent(&mut state, AppIntent::MatchSlopeRequested)
        .expect("Match-Slope");

    let previous = state.chain.segments()[0];
    let current = state.chain.segments()[1];
    assert_relative_eq!(
        current.derivative_at(current.start_idx()),
        previous.derivative_at(previous.end_idx()),
        max_relative = 1e-6
    );
}

// ─── Struktur ────────────────────────────────────────────────────────

#[test]
fn test_add_segment_selects_new_segment() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    let last_before = state.chain.segments()[2];

    controller
        .handle_intent(
            &mut state,
            AppIntent::AddSegmentRequested {
                segment_type: SegmentType::Linear,
                at_end: true,
            },
        )
        .expect("Segment anfügen");

    assert_eq!(state.chain.len(), 4);
    assert_eq!(state.selection.selected_segment, Some(3));
    let added = state.chain.segments()[3];
    assert_eq!(added.segment_type(), SegmentType::Linear);
    assert_eq!(added.start_idx(), last_before.end_idx() + 1);
    assert_relative_eq!(
        added.q_start().expect("q_start"),
        last_before.q_end().expect("q_end"),
        max_relative = 1e-12
    );
    assert_eq!(state.lock.locked(), Some(SegmentParam::EndIdx));
}

#[test]
fn test_add_segment_beyond_limit_is_rejected() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    state.options.max_segments = 3;

    controller
        .handle_intent(
            &mut state,
            AppIntent::AddSegmentRequested {
                segment_type: SegmentType::Flat,
                at_end: false,
            },
        )
        .expect("Ablehnung ist kein Fehler");

    assert_eq!(state.chain.len(), 3);
    assert!(state.ui.status_message.is_some());
}

#[test]
fn test_remove_interior_segment_is_rejected() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    select(&mut controller, &mut state, 1);

    controller
        .handle_intent(&mut state, AppIntent::RemoveSelectedSegmentRequested)
        .expect("Ablehnung ist kein Fehler");

    assert_eq!(state.chain.len(), 3);
    assert!(state.ui.status_message.is_some());
}

#[test]
fn test_remove_last_segment_resets_end_date() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    let end = state.chain.segments()[2].end_idx() - 100;
    controller
        .handle_intent(
            &mut state,
            AppIntent::EndCriterionChanged {
                criterion: EndCriterion::EndDate(end),
            },
        )
        .expect("Endkriterium");
    assert_eq!(state.chain.end_criterion(), EndCriterion::EndDate(end));
    assert_eq!(state.chain.segments()[2].end_idx(), end);

    select(&mut controller, &mut state, 2);
    controller
        .handle_intent(&mut state, AppIntent::RemoveSelectedSegmentRequested)
        .expect("Entfernen");

    assert_eq!(state.chain.len(), 2);
    assert_eq!(state.chain.end_criterion(), EndCriterion::EconomicLimit);
    assert_eq!(state.selection.selected_segment, Some(1));
}

#[test]
fn test_single_segment_cannot_be_removed() {
    let mut controller = AppController::new();
    let mut state = relative_state(&mut controller);

    controller
        .handle_intent(&mut state, AppIntent::RemoveSelectedSegmentRequested)
        .expect("Ablehnung ist kein Fehler");

    assert_eq!(state.chain.len(), 1);
    assert!(state.ui.status_message.is_some());
}

// ─── Terminierung ────────────────────────────────────────────────────

#[test]
fn test_termination_without_input_is_rejected() {
    let mut controller = AppController::new();
    let mut state = relative_state(&mut controller);
    let before = state.chain.clone();

    controller
        .handle_intent(&mut state, AppIntent::ApplyTerminationRequested)
        .expect("Ablehnung ist kein Fehler");

    assert_eq!(state.chain, before);
    assert!(state.ui.status_message.is_some());
}

#[test]
fn test_termination_uses_earlier_rate_bound() {
    let mut controller = AppController::new();
    let mut state = relative_state(&mut controller);
    let input = QFinalDict {
        q_final: 5.0,
        well_life: WellLifeMethod::DurationFromFirstData {
            num: 20,
            unit: LifeUnit::Years,
        },
    };

    controller
        .handle_intent(
            &mut state,
            AppIntent::TerminationInputChanged { input: Some(input) },
        )
        .expect("Eingabe");
    controller
        .handle_intent(&mut state, AppIntent::ApplyTerminationRequested)
        .expect("Terminierung");

    let last = state.chain.segments()[0];
    // 100 → 5 bei 30 %/a: ln(20) / ln(1/0.7) ≈ 8,4 Jahre
    assert!((3060..=3075).contains(&last.end_idx()), "Ende {}", last.end_idx());
    assert_relative_eq!(last.q_end().expect("q_end"), 5.0, max_relative = 1e-2);
    assert_eq!(
        state.chain.end_criterion(),
        EndCriterion::EndDate(last.end_idx())
    );
    assert_eq!(state.termination, Some(input));

    controller
        .handle_intent(&mut state, AppIntent::UndoRequested)
        .expect("Undo");
    assert_eq!(state.chain.segments()[0].end_idx(), 364);
}

// ─── Speichern ───────────────────────────────────────────────────────

#[test]
fn test_save_skips_unchanged_and_writes_after_edit() {
    let mut controller = AppController::new();
    let mut state = loaded_state(&mut controller);
    let path = temp_path("save_skip");

    controller
        .handle_intent(
            &mut state,
            AppIntent::SaveFilePathSelected { path: path.clone() },
        )
        .expect("Speichern unter");
    assert!(path.exists());
    assert_eq!(state.ui.current_file_path.as_ref(), Some(&path));

    std::fs::remove_file(&path).expect("Datei entfernbar");
    controller
        .handle_intent(&mut state, AppIntent::SaveRequested)
        .expect("Speichern");
    assert!(!path.exists(), "unveränderte Kette wird nicht erneut geschrieben");

    edit(&mut controller, &mut state, SegmentParam::QStart, 450.0);
    controller
        .handle_intent(&mut state, AppIntent::SaveRequested)
        .expect("Speichern");
    assert!(path.exists());

    let mut reloaded = AppState::new();
    controller
        .handle_intent(&mut reloaded, AppIntent::FileSelected { path: path.clone() })
        .expect("Neu laden");
    assert_eq!(reloaded.chain, state.chain);

    let _ = std::fs::remove_file(&path);
}
