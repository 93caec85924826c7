use super::{finish, ChainEdit};
use crate::app::AppState;
use crate::core::{EndCriterion, QFinalDict, SegmentChain};

/// Merkt die Terminierungs-Eingabe der Phase.
pub fn set_termination_input(state: &mut AppState, input: Option<QFinalDict>) {
    log::debug!("Terminierungs-Eingabe: {:?}", input);
    state.termination = input;
}

/// Terminiert das letzte Segment nach q-final und Lebensdauer-Regel.
pub fn apply_termination(state: &mut AppState) {
    if state.chain.is_empty() {
        log::debug!("Terminierung ohne Segmente ignoriert");
        return;
    }
    let axis = state.units().axis;
    let mut chain = (*state.chain).clone();
    let result = chain
        .apply_termination(state.termination.as_ref(), &axis)
        .map(|warnings| (chain, warnings));
    finish(state, "Terminierung", result);
}

/// Setzt das Endkriterium; ein Enddatum kürzt bzw. verlängert das letzte Segment.
pub fn set_end_criterion(state: &mut AppState, criterion: EndCriterion) {
    let result = with_end_criterion(&state.chain, criterion);
    finish(state, "Endkriterium", result);
}

fn with_end_criterion(chain: &SegmentChain, criterion: EndCriterion) -> ChainEdit {
    let mut next = chain.clone();
    let mut warnings = Vec::new();
    let mut criterion = criterion;

    if let (EndCriterion::EndDate(idx), Some(last)) = (criterion, chain.last()) {
        let edit = last.change_end_idx(idx as f64)?;
        criterion = EndCriterion::EndDate(edit.segment.end_idx());
        next.apply_edit(chain.len() - 1, edit.segment)?;
        warnings = edit.warnings;
    }

    next.set_end_criterion(criterion);
    Ok((next, warnings))
}
