//! Decline Curve Editor.
//!
//! Kommandozeilen-Host des Editors: lädt eine Datensatz-Datei, wendet optional
//! eine Terminierung an, gibt eine Übersicht der Kette aus und speichert bei
//! Änderungen zurück.

use anyhow::Context;
use decline_curve_editor::{
    AppController, AppIntent, AppState, EditorOptions, QFinalDict, ViewValue,
};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> anyhow::Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!(
            "Decline Curve Editor v{} startet...",
            env!("CARGO_PKG_VERSION")
        );

        let mut args = std::env::args().skip(1);
        let Some(records_path) = args.next().map(PathBuf::from) else {
            eprintln!("Aufruf: decline-curve-editor <datensaetze.json> [terminierung.json]");
            return Ok(());
        };
        let termination_path = args.next().map(PathBuf::from);

        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = EditorOptions::config_path();
        let mut state = AppState::with_options(EditorOptions::load_from_file(&config_path));
        let mut controller = AppController::new();

        controller.handle_intent(&mut state, AppIntent::FileSelected { path: records_path })?;

        if let Some(path) = termination_path {
            let input = read_termination(&path)?;
            controller.handle_intent(
                &mut state,
                AppIntent::TerminationInputChanged { input: Some(input) },
            )?;
            controller.handle_intent(&mut state, AppIntent::ApplyTerminationRequested)?;
        }

        print_summary(&state);

        controller.handle_intent(&mut state, AppIntent::SaveRequested)?;
        if let Some(message) = state.ui.status_message.as_deref() {
            eprintln!("Hinweis: {}", message);
        }
        controller.handle_intent(&mut state, AppIntent::ExitRequested)?;
        Ok(())
    }
}

/// Liest eine Terminierungs-Eingabe (JSON).
fn read_termination(path: &std::path::Path) -> anyhow::Result<QFinalDict> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Terminierung {} konnte nicht gelesen werden", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Terminierung {} ist ungültig", path.display()))
}

fn format_view(value: ViewValue) -> String {
    match value {
        ViewValue::Number(number) => format!("{:.0}", number),
        ViewValue::Date(date) => date.to_string(),
    }
}

fn format_rate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |q| format!("{:.3}", q))
}

/// Gibt Segmente, Raten und Volumina der Kette aus.
fn print_summary(state: &AppState) {
    let units = state.units();
    println!(
        "{:>3}  {:<13} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "#", "Typ", "Start", "Ende", "q_start", "q_end", "Volumen"
    );
    for (index, segment) in state.chain.segments().iter().enumerate() {
        let view = units.segment_view(segment);
        println!(
            "{:>3}  {:<13} {:>12} {:>12} {:>12} {:>12} {:>14.1}",
            index,
            view.segment_type.as_str(),
            format_view(view.start),
            format_view(view.end),
            format_rate(view.q_start),
            format_rate(view.q_end),
            segment.volume()
        );
    }
    println!(
        "Segmente: {}  Gesamtvolumen: {:.1}  Raten in {}",
        state.chain.len(),
        state.chain.total_volume(),
        units.rate.unit().label
    );
}
