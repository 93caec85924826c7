//! Core-Domäne: Decline-Gesetze, Segmente, Segmentkette und Editier-Regeln.

pub mod boundary;
pub mod chain;
/// Ratengesetze je Segmenttyp
///
/// Enthält die Gleichungen (Rate, Ableitung, Zeit bis Rate, Volumen) und
/// die Umrechnung effektiver ↔ nominaler Decline.
pub mod decline;
pub mod error;
pub mod lock;
pub mod ranges;
pub mod record;
pub mod segment;
pub mod termination;
pub mod units;

pub use boundary::{anchor, connect, match_slope, Direction};
pub use chain::{BoundarySide, EndCriterion, SegmentChain};
pub use decline::{DeclineLaw, Law};
pub use error::{EditError, RangeWarning};
pub use lock::{lockable_params, resolve_edit, LockState};
pub use record::{build_chain, try_build_chain, OrderedSegmentRecord, RecordError};
pub use segment::{Edit, Segment, SegmentDefaults, SegmentParam, SegmentShape, SegmentType};
pub use termination::{apply_termination, LifeUnit, QFinalDict, WellLifeMethod};
pub use units::{
    DomainAxis, LinearUnit, RateBasis, SegmentView, UnitConversion, UnitSystem, ViewValue,
};
