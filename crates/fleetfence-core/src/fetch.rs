//! Loading/error flags for upstream record collections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchState {
    pub loading: bool,
    /// Message for the inline error banner.
    pub error: Option<String>,
    /// Records received by the last successful fetch.
    pub records_loaded: usize,
}

impl FetchState {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAction {
    Started,
    Succeeded(usize),
    Failed(String),
}

/// No retries: a failure stays until the next `Started`.
pub fn reduce_fetch(state: &FetchState, action: FetchAction) -> FetchState {
    match action {
        FetchAction::Started => FetchState {
            loading: true,
            error: None,
            records_loaded: state.records_loaded,
        },
        FetchAction::Succeeded(count) => FetchState {
            loading: false,
            error: None,
            records_loaded: count,
        },
        FetchAction::Failed(message) => FetchState {
            loading: false,
            error: Some(message),
            records_loaded: state.records_loaded,
        },
    }
}
