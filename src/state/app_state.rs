use crate::app::MenuItem;
use chrono::{DateTime, Local};
use evg_league::ranking::StatView;
use evg_league::{Snapshot, Standings, TeamId};

/// Group tables and the group roster share the same navigation: one group
/// at a time, one highlighted row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupCursor {
    pub group: usize,
    pub row: usize,
}

impl GroupCursor {
    pub fn next_group(&mut self, group_count: usize) {
        if group_count > 0 {
            self.group = (self.group + 1) % group_count;
            self.row = 0;
        }
    }

    pub fn prev_group(&mut self, group_count: usize) {
        if group_count > 0 {
            self.group = (self.group + group_count - 1) % group_count;
            self.row = 0;
        }
    }

    pub fn row_down(&mut self, row_count: usize) {
        if self.row + 1 < row_count {
            self.row += 1;
        }
    }

    pub fn row_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    /// Keep the cursor inside the data after a reload.
    pub fn clamp(&mut self, group_count: usize, row_count: impl Fn(usize) -> usize) {
        if self.group >= group_count {
            self.group = 0;
            self.row = 0;
        }
        let rows = row_count(self.group);
        if self.row >= rows {
            self.row = rows.saturating_sub(1);
        }
    }
}

/// Vertical scroll of a text view. `max` is refreshed on every draw from the
/// rendered line count, so key presses never move past the content.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scroll {
    pub offset: u16,
    max: u16,
}

impl Scroll {
    pub fn down(&mut self) {
        self.offset = self.offset.saturating_add(1).min(self.max);
    }

    pub fn up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Largest offset that still shows the last line in a viewport of
    /// `height` rows.
    pub fn fit(&mut self, content_lines: usize, height: u16) {
        let max = content_lines.saturating_sub(usize::from(height));
        self.max = u16::try_from(max).unwrap_or(u16::MAX);
        self.offset = self.offset.min(self.max);
    }
}

#[derive(Debug, Default)]
pub struct ScheduleState {
    /// `None` lists every match.
    pub selected_week: Option<u32>,
    /// The user asked for every week; reloads keep that choice.
    pub all_weeks: bool,
    pub weeks: Vec<u32>,
    pub scroll: Scroll,
}

impl ScheduleState {
    /// Refresh the week list, keeping the current choice while that week
    /// still exists and falling back to the latest week otherwise.
    pub fn update_weeks(&mut self, weeks: Vec<u32>, default_week: Option<u32>) {
        if !self.all_weeks {
            let keep = self.selected_week.filter(|w| weeks.contains(w));
            self.selected_week = keep.or(default_week);
        }
        self.weeks = weeks;
    }

    pub fn next_week(&mut self) {
        self.step_week(1);
    }

    pub fn prev_week(&mut self) {
        self.step_week(-1);
    }

    pub fn show_all_weeks(&mut self) {
        self.all_weeks = true;
        self.selected_week = None;
        self.scroll.reset();
    }

    fn step_week(&mut self, delta: isize) {
        if self.weeks.is_empty() {
            return;
        }
        let last = self.weeks.len() as isize - 1;
        let idx = match self.selected_week.and_then(|w| self.weeks.iter().position(|x| *x == w)) {
            Some(idx) => (idx as isize + delta).clamp(0, last),
            // from "all weeks" step onto either end
            None if delta > 0 => 0,
            None => last,
        };
        self.selected_week = Some(self.weeks[idx as usize]);
        self.all_weeks = false;
        self.scroll.reset();
    }
}

#[derive(Debug, Default)]
pub struct TeamDetailState {
    pub team_id: Option<TeamId>,
    pub scroll: Scroll,
}

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
    pub snapshot: Option<Snapshot>,
    pub standings: Standings,
    pub table: GroupCursor,
    pub roster: GroupCursor,
    pub stat_view: StatView,
    pub schedule: ScheduleState,
    pub team_detail: TeamDetailState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_cursor_wraps_and_resets_row() {
        let mut cursor = GroupCursor { group: 1, row: 3 };
        cursor.next_group(2);
        assert_eq!(cursor, GroupCursor { group: 0, row: 0 });
        cursor.prev_group(2);
        assert_eq!(cursor.group, 1);
    }

    #[test]
    fn group_cursor_stays_inside_rows() {
        let mut cursor = GroupCursor::default();
        cursor.row_down(2);
        cursor.row_down(2);
        assert_eq!(cursor.row, 1);
        cursor.row_up();
        cursor.row_up();
        assert_eq!(cursor.row, 0);

        let mut cursor = GroupCursor { group: 4, row: 9 };
        cursor.clamp(2, |_| 3);
        assert_eq!(cursor, GroupCursor { group: 0, row: 0 });
        let mut cursor = GroupCursor { group: 1, row: 9 };
        cursor.clamp(2, |_| 3);
        assert_eq!(cursor, GroupCursor { group: 1, row: 2 });
    }

    #[test]
    fn scroll_stops_at_the_last_line() {
        let mut scroll = Scroll::default();
        scroll.fit(12, 10);
        for _ in 0..5 {
            scroll.down();
        }
        assert_eq!(scroll.offset, 2);
        scroll.up();
        assert_eq!(scroll.offset, 1);

        scroll.fit(4, 10);
        assert_eq!(scroll.offset, 0);
        scroll.down();
        assert_eq!(scroll.offset, 0);
    }

    #[test]
    fn week_change_resets_schedule_scroll() {
        let mut schedule = ScheduleState::default();
        schedule.update_weeks(vec![1, 2], Some(1));
        schedule.scroll.fit(30, 10);
        schedule.scroll.down();
        schedule.next_week();
        assert_eq!(schedule.scroll.offset, 0);
    }

    #[test]
    fn week_selection_survives_reload_when_week_still_exists() {
        let mut schedule = ScheduleState::default();
        schedule.update_weeks(vec![1, 2, 3], Some(3));
        assert_eq!(schedule.selected_week, Some(3));

        schedule.prev_week();
        schedule.update_weeks(vec![1, 2, 3, 4], Some(4));
        assert_eq!(schedule.selected_week, Some(2));

        schedule.update_weeks(vec![1, 4], Some(4));
        assert_eq!(schedule.selected_week, Some(4));

        schedule.show_all_weeks();
        schedule.update_weeks(vec![1, 4, 5], Some(5));
        assert_eq!(schedule.selected_week, None);
    }

    #[test]
    fn week_stepping_clamps_at_the_ends() {
        let mut schedule = ScheduleState::default();
        schedule.update_weeks(vec![1, 2], Some(2));
        schedule.next_week();
        assert_eq!(schedule.selected_week, Some(2));
        schedule.prev_week();
        schedule.prev_week();
        assert_eq!(schedule.selected_week, Some(1));

        schedule.show_all_weeks();
        schedule.prev_week();
        assert_eq!(schedule.selected_week, Some(2));
    }
}
