//! Fetch state for the dashboard (search / startup rehydration).
//!
//! Drives the "Loading..." indicator. There is no timeout: a request that
//! never settles leaves the state busy.

/// Which network operation, if any, is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Searching,
    Rehydrating,
}

impl FetchState {
    /// True while any fetch is outstanding.
    pub fn is_loading(self) -> bool {
        !matches!(self, FetchState::Idle)
    }
}
