use crate::state::network::LoadingState;
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use evg_league::Snapshot;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Startup or user-requested reload; shows the spinner.
    LoadSnapshot,
    /// Periodic background reload.
    RefreshSnapshot,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SnapshotLoaded { snapshot: Snapshot, fetched_at: DateTime<Local> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
