use crate::{StandingsRow, TeamId};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Number of rows shown on each statistical leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// League table order: points, goal difference, wins, goals for (all
/// descending). Falls back to name then id so the order is total.
pub fn table_order(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| identity_order(a, b))
}

fn identity_order(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    a.team_name
        .cmp(&b.team_name)
        .then_with(|| a.team_id.cmp(&b.team_id))
}

pub fn rank_table(rows: &[StandingsRow]) -> Vec<StandingsRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(table_order);
    ranked
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatView {
    #[default]
    BestDefense,
    TopScorer,
    MostConceded,
}

impl StatView {
    pub const ALL: [StatView; 3] = [StatView::BestDefense, StatView::TopScorer, StatView::MostConceded];

    pub fn label(&self) -> &'static str {
        match self {
            StatView::BestDefense => "Best defense",
            StatView::TopScorer => "Top scorer",
            StatView::MostConceded => "Most goals conceded",
        }
    }

    /// Column header for the headline statistic.
    pub fn stat_label(&self) -> &'static str {
        match self {
            StatView::TopScorer => "GF",
            StatView::BestDefense | StatView::MostConceded => "GC",
        }
    }

    pub fn headline(&self, row: &StandingsRow) -> u32 {
        match self {
            StatView::TopScorer => row.goals_for,
            StatView::BestDefense | StatView::MostConceded => row.goals_against,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            StatView::BestDefense => StatView::TopScorer,
            StatView::TopScorer => StatView::MostConceded,
            StatView::MostConceded => StatView::BestDefense,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            StatView::BestDefense => StatView::MostConceded,
            StatView::TopScorer => StatView::BestDefense,
            StatView::MostConceded => StatView::TopScorer,
        }
    }

    pub fn compare(&self, a: &StandingsRow, b: &StandingsRow) -> Ordering {
        let primary = match self {
            StatView::BestDefense => a.goals_against.cmp(&b.goals_against),
            StatView::TopScorer => b.goals_for.cmp(&a.goals_for),
            StatView::MostConceded => b.goals_against.cmp(&a.goals_against),
        };
        let last = match self {
            StatView::TopScorer => a.goals_against.cmp(&b.goals_against),
            StatView::BestDefense | StatView::MostConceded => b.goals_for.cmp(&a.goals_for),
        };
        primary
            .then_with(|| b.points.cmp(&a.points))
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            .then(last)
            .then_with(|| identity_order(a, b))
    }
}

/// Top [`LEADERBOARD_SIZE`] rows of the pool under `view`.
pub fn leaderboard(pool: &[StandingsRow], view: StatView) -> Vec<StandingsRow> {
    let mut rows = pool.to_vec();
    rows.sort_by(|a, b| view.compare(a, b));
    rows.truncate(LEADERBOARD_SIZE);
    rows
}

/// Concatenate group tables, keeping the first row seen for each team.
pub fn unified_pool<'a>(groups: impl IntoIterator<Item = &'a [StandingsRow]>) -> Vec<StandingsRow> {
    let mut seen: HashSet<TeamId> = HashSet::new();
    groups
        .into_iter()
        .flatten()
        .filter(|row| seen.insert(row.team_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(team_id: TeamId, name: &str, points: u32, gf: u32, ga: u32) -> StandingsRow {
        StandingsRow {
            team_id,
            team_name: name.into(),
            points,
            goals_for: gf,
            goals_against: ga,
            goal_difference: i64::from(gf) - i64::from(ga),
            ..Default::default()
        }
    }

    fn names(rows: &[StandingsRow]) -> Vec<&str> {
        rows.iter().map(|r| r.team_name.as_str()).collect()
    }

    #[test]
    fn table_sorts_by_points_first() {
        let rows = vec![row(1, "A", 2, 1, 0), row(2, "B", 6, 0, 5), row(3, "C", 4, 3, 3)];
        assert_eq!(names(&rank_table(&rows)), vec!["B", "C", "A"]);
    }

    #[test]
    fn table_breaks_ties_on_goal_difference_then_wins_then_goals_for() {
        let mut gd = row(1, "GD", 4, 5, 1);
        let mut wins = row(2, "Wins", 4, 4, 2);
        wins.wins = 2;
        let mut gf = row(3, "GF", 4, 6, 4);
        gf.wins = 1;
        let mut low = row(4, "Low", 4, 3, 1);
        low.wins = 1;
        gd.wins = 0;

        let ranked = rank_table(&[low, gf, wins, gd]);
        assert_eq!(names(&ranked), vec!["GD", "Wins", "GF", "Low"]);
    }

    #[test]
    fn identical_records_fall_back_to_name_then_id() {
        let rows = vec![row(9, "Zorros", 3, 2, 2), row(5, "Osos", 3, 2, 2), row(2, "Osos", 3, 2, 2)];
        let ranked = rank_table(&rows);
        let ids: Vec<TeamId> = ranked.iter().map(|r| r.team_id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn top_scorer_ranks_goals_for_descending() {
        let group_a = vec![row(1, "Cinco", 2, 5, 1), row(2, "TresA", 4, 3, 0)];
        let group_b = vec![row(3, "TresB", 1, 3, 2), row(4, "Siete", 0, 7, 9)];
        let pool = unified_pool([group_a.as_slice(), group_b.as_slice()]);

        let board = leaderboard(&pool, StatView::TopScorer);
        let gf: Vec<u32> = board.iter().map(|r| StatView::TopScorer.headline(r)).collect();
        assert_eq!(gf, vec![7, 5, 3, 3]);
        // equal goals: more points first
        assert_eq!(names(&board[2..]), vec!["TresA", "TresB"]);
    }

    #[test]
    fn best_defense_and_most_conceded_use_goals_against() {
        let pool = vec![row(1, "A", 0, 1, 4), row(2, "B", 0, 1, 1), row(3, "C", 0, 1, 9)];
        assert_eq!(names(&leaderboard(&pool, StatView::BestDefense)), vec!["B", "A", "C"]);
        assert_eq!(names(&leaderboard(&pool, StatView::MostConceded)), vec!["C", "A", "B"]);
        assert_eq!(StatView::BestDefense.stat_label(), "GC");
        assert_eq!(StatView::TopScorer.stat_label(), "GF");
    }

    #[test]
    fn leaderboards_are_capped_at_five() {
        let pool: Vec<StandingsRow> = (1..=8).map(|id| row(id, "T", 0, id as u32, 0)).collect();
        let board = leaderboard(&pool, StatView::TopScorer);
        assert_eq!(board.len(), LEADERBOARD_SIZE);
        assert_eq!(board[0].team_id, 8);
    }

    #[test]
    fn pool_keeps_first_row_per_team() {
        let a = vec![row(1, "A", 3, 0, 0)];
        let b = vec![row(1, "A", 99, 0, 0), row(2, "B", 0, 0, 0)];
        let pool = unified_pool([a.as_slice(), b.as_slice()]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].points, 3);
    }

    #[test]
    fn views_cycle_both_ways() {
        for view in StatView::ALL {
            assert_eq!(view.next().prev(), view);
        }
        assert_eq!(StatView::MostConceded.next(), StatView::BestDefense);
    }
}
