use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Stats),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Schedule),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Groups),
        (_, Char('5'), _) => guard.update_tab(MenuItem::TeamDetail),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Standings
        (MenuItem::Standings, Char('l') | KeyCode::Right, _) => guard.table_next_group(),
        (MenuItem::Standings, Char('h') | KeyCode::Left, _) => guard.table_prev_group(),
        (MenuItem::Standings, Char('j') | KeyCode::Down, _) => guard.table_row_down(),
        (MenuItem::Standings, Char('k') | KeyCode::Up, _) => guard.table_row_up(),

        // Stats
        (MenuItem::Stats, Char('l' | 's') | KeyCode::Right, _) => guard.next_stat_view(),
        (MenuItem::Stats, Char('h') | KeyCode::Left, _) => guard.prev_stat_view(),

        // Schedule
        (MenuItem::Schedule, Char('l') | KeyCode::Right, _) => guard.state.schedule.next_week(),
        (MenuItem::Schedule, Char('h') | KeyCode::Left, _) => guard.state.schedule.prev_week(),
        (MenuItem::Schedule, Char('a'), _) => guard.state.schedule.show_all_weeks(),
        (MenuItem::Schedule, Char('j') | KeyCode::Down, _) => guard.state.schedule.scroll.down(),
        (MenuItem::Schedule, Char('k') | KeyCode::Up, _) => guard.state.schedule.scroll.up(),

        // Groups
        (MenuItem::Groups, Char('l') | KeyCode::Right, _) => guard.roster_next_group(),
        (MenuItem::Groups, Char('h') | KeyCode::Left, _) => guard.roster_prev_group(),
        (MenuItem::Groups, Char('j') | KeyCode::Down, _) => guard.roster_row_down(),
        (MenuItem::Groups, Char('k') | KeyCode::Up, _) => guard.roster_row_up(),

        (MenuItem::Standings | MenuItem::Groups, KeyCode::Enter, _) => {
            guard.open_team_detail();
        }

        // Team detail
        (MenuItem::TeamDetail, Char('j') | KeyCode::Down, _) => guard.state.team_detail.scroll.down(),
        (MenuItem::TeamDetail, Char('k') | KeyCode::Up, _) => guard.state.team_detail.scroll.up(),
        (MenuItem::TeamDetail, KeyCode::Esc, _) => guard.exit_team_detail(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),
        (_, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSnapshot).await;
        }

        _ => {}
    }
}
