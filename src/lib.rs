//! Decline Curve Editor Library.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod records;
pub mod shared;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, KeyCombo, StepKey, UiState, ViewState,
};
pub use core::{
    build_chain, BoundarySide, Direction, EditError, EndCriterion, LifeUnit, LockState,
    OrderedSegmentRecord, QFinalDict, RangeWarning, Segment, SegmentChain, SegmentParam,
    SegmentShape, SegmentType, UnitSystem, ViewValue, WellLifeMethod,
};
pub use records::{parse_records_document, write_records_document, RecordsDocument};
pub use shared::{CurveScene, EditorOptions};
