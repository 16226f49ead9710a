use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use chrono::{DateTime, Local};
use evg_league::{GroupLabel, Snapshot, StandingsRow, Team, TeamId, compute_standings, filters};
use log::{error, info};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Standings,
    Stats,
    Schedule,
    Groups,
    TeamDetail,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let app = Self::with_settings(AppSettings::load());

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self { state: AppState::new(), settings }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Re-aggregate from scratch. A snapshot the aggregator rejects leaves the
    /// previous one on screen.
    pub fn on_snapshot_loaded(&mut self, snapshot: Snapshot, fetched_at: DateTime<Local>) {
        let standings = match compute_standings(&snapshot, &self.settings.league) {
            Ok(standings) => standings,
            Err(e) => {
                error!("standings rejected: {e}");
                self.state.last_error = Some(e.to_string());
                return;
            }
        };
        info!(
            "standings updated: {} teams in {} groups",
            snapshot.teams.len(),
            standings.labels().count()
        );

        self.state.schedule.update_weeks(
            filters::available_weeks(&snapshot.matches),
            filters::default_week(&snapshot.matches),
        );
        self.state.standings = standings;
        self.state.snapshot = Some(snapshot);
        self.state.last_updated = Some(fetched_at);
        self.state.last_error = None;

        let group_count = self.group_labels().len();
        let labels = self.group_labels();
        let table_rows = |g: usize| labels.get(g).map(|l| self.state.standings.group(l).len()).unwrap_or(0);
        let roster_rows = |g: usize| labels.get(g).map(|l| self.roster(l).len()).unwrap_or(0);
        let mut table = self.state.table;
        let mut roster = self.state.roster;
        table.clamp(group_count, table_rows);
        roster.clamp(group_count, roster_rows);
        self.state.table = table;
        self.state.roster = roster;

        if let Some(team_id) = self.state.team_detail.team_id
            && self.team(team_id).is_none()
        {
            self.state.team_detail.team_id = None;
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn group_labels(&self) -> Vec<GroupLabel> {
        self.state.standings.labels().cloned().collect()
    }

    pub fn selected_table_group(&self) -> Option<GroupLabel> {
        self.group_labels().get(self.state.table.group).cloned()
    }

    pub fn selected_roster_group(&self) -> Option<GroupLabel> {
        self.group_labels().get(self.state.roster.group).cloned()
    }

    pub fn ranked_table(&self, label: &GroupLabel) -> Vec<StandingsRow> {
        self.state.standings.table(label)
    }

    pub fn roster(&self, label: &GroupLabel) -> Vec<&Team> {
        let Some(snapshot) = self.state.snapshot.as_ref() else {
            return Vec::new();
        };
        filters::roster_by_group(&snapshot.teams)
            .remove(label)
            .unwrap_or_default()
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.state.snapshot.as_ref()?.team(team_id)
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn exit_team_detail(&mut self) {
        if self.state.active_tab == MenuItem::TeamDetail {
            let back = match self.state.previous_tab {
                MenuItem::TeamDetail | MenuItem::Help => MenuItem::Standings,
                tab => tab,
            };
            self.state.active_tab = back;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn table_next_group(&mut self) {
        let count = self.group_labels().len();
        self.state.table.next_group(count);
    }

    pub fn table_prev_group(&mut self) {
        let count = self.group_labels().len();
        self.state.table.prev_group(count);
    }

    pub fn table_row_down(&mut self) {
        let rows = self
            .selected_table_group()
            .map(|l| self.state.standings.group(&l).len())
            .unwrap_or(0);
        self.state.table.row_down(rows);
    }

    pub fn table_row_up(&mut self) {
        self.state.table.row_up();
    }

    pub fn roster_next_group(&mut self) {
        let count = self.group_labels().len();
        self.state.roster.next_group(count);
    }

    pub fn roster_prev_group(&mut self) {
        let count = self.group_labels().len();
        self.state.roster.prev_group(count);
    }

    pub fn roster_row_down(&mut self) {
        let rows = self.selected_roster_group().map(|l| self.roster(&l).len()).unwrap_or(0);
        self.state.roster.row_down(rows);
    }

    pub fn roster_row_up(&mut self) {
        self.state.roster.row_up();
    }

    pub fn next_stat_view(&mut self) {
        self.state.stat_view = self.state.stat_view.next();
    }

    pub fn prev_stat_view(&mut self) {
        self.state.stat_view = self.state.stat_view.prev();
    }

    /// Team under the cursor of the standings table.
    pub fn highlighted_table_team(&self) -> Option<TeamId> {
        let label = self.selected_table_group()?;
        self.ranked_table(&label).get(self.state.table.row).map(|r| r.team_id)
    }

    pub fn highlighted_roster_team(&self) -> Option<TeamId> {
        let label = self.selected_roster_group()?;
        self.roster(&label).get(self.state.roster.row).map(|t| t.id)
    }

    /// Open the history of the highlighted team. Returns false when nothing
    /// is highlighted.
    pub fn open_team_detail(&mut self) -> bool {
        let team = match self.state.active_tab {
            MenuItem::Standings => self.highlighted_table_team(),
            MenuItem::Groups => self.highlighted_roster_team(),
            _ => None,
        };
        let Some(team_id) = team else {
            return false;
        };
        self.state.team_detail.team_id = Some(team_id);
        self.state.team_detail.scroll.reset();
        self.update_tab(MenuItem::TeamDetail);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evg_league::{LeagueConfig, Match, MatchState, ReferencePolicy};

    fn team(id: TeamId, name: &str, group: &str) -> Team {
        Team { id, name: name.into(), group: group.into(), logo_ref: None }
    }

    fn result(id: u64, week: u32, home: TeamId, away: TeamId, h: u16, a: u16) -> Match {
        Match {
            id,
            group: "A".into(),
            home_team_id: home,
            away_team_id: away,
            week: Some(week),
            state: MatchState::Completed { home: h, away: a },
            ..Default::default()
        }
    }

    fn snapshot(matches: Vec<Match>) -> Snapshot {
        Snapshot::new(
            vec![team(1, "Halcones", "A"), team(2, "Jaguares", "A"), team(3, "Lobos", "B")],
            vec![],
            matches,
        )
    }

    fn app() -> App {
        App::with_settings(AppSettings::default())
    }

    #[test]
    fn snapshot_load_builds_ranked_tables() {
        let mut app = app();
        app.on_snapshot_loaded(snapshot(vec![result(1, 1, 2, 1, 2, 0)]), Local::now());

        assert_eq!(app.group_labels(), vec![GroupLabel::from("A"), GroupLabel::from("B")]);
        let table = app.ranked_table(&"A".into());
        assert_eq!(table[0].team_name, "Jaguares");
        assert_eq!(table[0].points, 2);
        assert_eq!(app.state.schedule.selected_week, Some(1));
        assert!(app.state.last_updated.is_some());
    }

    #[test]
    fn rejected_snapshot_keeps_previous_standings() {
        let mut app = app();
        app.on_snapshot_loaded(snapshot(vec![result(1, 1, 2, 1, 2, 0)]), Local::now());

        app.settings.league = LeagueConfig { references: ReferencePolicy::Strict, ..Default::default() };
        app.on_snapshot_loaded(snapshot(vec![result(2, 2, 1, 42, 1, 0)]), Local::now());

        assert!(app.state.last_error.is_some());
        assert_eq!(app.ranked_table(&"A".into())[0].team_name, "Jaguares");
        assert_eq!(app.state.schedule.selected_week, Some(1));
    }

    #[test]
    fn enter_on_table_row_opens_team_history() {
        let mut app = app();
        app.on_snapshot_loaded(snapshot(vec![result(1, 1, 2, 1, 2, 0)]), Local::now());
        app.table_row_down();

        assert!(app.open_team_detail());
        assert_eq!(app.state.active_tab, MenuItem::TeamDetail);
        assert_eq!(app.state.team_detail.team_id, Some(1));

        app.exit_team_detail();
        assert_eq!(app.state.active_tab, MenuItem::Standings);
    }

    #[test]
    fn group_navigation_wraps() {
        let mut app = app();
        app.on_snapshot_loaded(snapshot(vec![]), Local::now());
        app.table_next_group();
        assert_eq!(app.selected_table_group(), Some("B".into()));
        app.table_next_group();
        assert_eq!(app.selected_table_group(), Some("A".into()));
        app.roster_prev_group();
        assert_eq!(app.selected_roster_group(), Some("B".into()));
    }

    #[test]
    fn nothing_to_open_without_data() {
        let mut app = app();
        assert!(!app.open_team_detail());
        assert_eq!(app.state.active_tab, MenuItem::Standings);
    }
}
