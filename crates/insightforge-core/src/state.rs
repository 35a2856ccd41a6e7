//! View state machine discriminant.

use strum::Display;

/// The top-level screen currently in control.
///
/// Exactly one state is active at a time. `Form` is the initial state
/// whenever there is no active report; `Loading` exists only while a
/// generation is in flight; `Report` requires a non-null active report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ViewState {
    #[default]
    Form,
    Loading,
    Report,
}
