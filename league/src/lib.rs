pub mod client;
pub mod config;
pub mod filters;
pub mod ranking;
pub mod standings;
pub mod supabase;

pub use config::{LeagueConfig, ReferencePolicy, ScoringRules};
pub use standings::{Standings, compute_standings};

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

pub type TeamId = u64;
pub type MatchId = u64;

// ---------------------------------------------------------------------------
// Domain types, independent of the backend wire format
// ---------------------------------------------------------------------------

/// Group a team plays in ("A", "B", ...). Teams only meet inside their group.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupLabel(String);

impl GroupLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub group: GroupLabel,
    pub logo_ref: Option<String>,
}

/// Totals recorded before the live schedule started. Starting point of the
/// accumulator for its team, never a replacement for match results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedStanding {
    pub team_id: TeamId,
    pub points: u32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// A fixture is either waiting for a result or carries both scores.
/// Half-filled results are rejected before they reach this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchState {
    #[default]
    Scheduled,
    Completed { home: u16, away: u16 },
}

impl MatchState {
    /// `None` when exactly one score is present.
    pub fn from_scores(home: Option<u16>, away: Option<u16>) -> Option<Self> {
        match (home, away) {
            (Some(home), Some(away)) => Some(MatchState::Completed { home, away }),
            (None, None) => Some(MatchState::Scheduled),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MatchState::Completed { .. })
    }

    pub fn score(&self) -> Option<(u16, u16)> {
        match *self {
            MatchState::Completed { home, away } => Some((home, away)),
            MatchState::Scheduled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub group: GroupLabel,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Assigned by the administrator, not derived from the date.
    pub week: Option<u32>,
    pub state: MatchState,
}

impl Match {
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn score(&self) -> Option<(u16, u16)> {
        self.state.score()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let (home, away) = self.score()?;
        Some(match home.cmp(&away) {
            Ordering::Greater => Outcome::HomeWin,
            Ordering::Less => Outcome::AwayWin,
            Ordering::Equal => Outcome::Draw,
        })
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// True for a fixture between `a` and `b` in either home/away orientation.
    pub fn is_between(&self, a: TeamId, b: TeamId) -> bool {
        (self.home_team_id == a && self.away_team_id == b)
            || (self.home_team_id == b && self.away_team_id == a)
    }
}

/// Derived table line. Rebuilt from the snapshot on every aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingsRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub points: u32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
}

impl StandingsRow {
    pub fn from_seed(team: &Team, seed: Option<&SeedStanding>) -> Self {
        let seed = seed.cloned().unwrap_or_default();
        let mut row = Self {
            team_id: team.id,
            team_name: team.name.clone(),
            points: seed.points,
            played: seed.played,
            wins: seed.wins,
            draws: seed.draws,
            losses: seed.losses,
            goals_for: seed.goals_for,
            goals_against: seed.goals_against,
            goal_difference: 0,
        };
        row.refresh_goal_difference();
        row
    }

    /// Apply one completed match from this team's point of view. Counters
    /// saturate at `u32::MAX`.
    pub fn record(&mut self, scored: u16, conceded: u16, scoring: &ScoringRules) {
        self.played = self.played.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(u32::from(scored));
        self.goals_against = self.goals_against.saturating_add(u32::from(conceded));
        self.refresh_goal_difference();

        let awarded = match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.wins = self.wins.saturating_add(1);
                scoring.win
            }
            Ordering::Less => {
                self.losses = self.losses.saturating_add(1);
                scoring.loss
            }
            Ordering::Equal => {
                self.draws = self.draws.saturating_add(1);
                scoring.draw
            }
        };
        self.points = self.points.saturating_add(awarded);
    }

    fn refresh_goal_difference(&mut self) {
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
    }
}

/// Immutable bundle of the three backend tables taken at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub teams: Vec<Team>,
    pub seeds: Vec<SeedStanding>,
    pub matches: Vec<Match>,
}

impl Snapshot {
    pub fn new(teams: Vec<Team>, seeds: Vec<SeedStanding>, matches: Vec<Match>) -> Self {
        Self { teams, seeds, matches }
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Display name, or "??" for a dangling reference.
    pub fn team_name(&self, team_id: TeamId) -> &str {
        self.team(team_id).map(|t| t.name.as_str()).unwrap_or("??")
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

pub type LeagueResult<T> = Result<T, LeagueError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeagueError {
    /// A match names a team that is not registered in the match's group.
    UnknownTeam { match_id: MatchId, team_id: TeamId, group: GroupLabel },
    /// A match record carries exactly one of its two scores.
    PartialScore { match_id: MatchId },
    /// A match record lost its home or away team reference.
    MissingReference { match_id: MatchId },
    /// A score that is negative or too large to be a goal count.
    ScoreOutOfRange { match_id: MatchId, score: i64 },
    MissingTeam { team_id: TeamId },
    SameTeam { team_id: TeamId },
    TeamNotInGroup { team_id: TeamId, group: GroupLabel },
    AlreadyPlayed { home: TeamId, away: TeamId },
}

impl fmt::Display for LeagueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeagueError::UnknownTeam { match_id, team_id, group } => write!(
                f,
                "match {match_id} references team {team_id} which is not in group {group}"
            ),
            LeagueError::PartialScore { match_id } => {
                write!(f, "match {match_id} has only one of its two scores")
            }
            LeagueError::MissingReference { match_id } => {
                write!(f, "match {match_id} has no home or away team")
            }
            LeagueError::ScoreOutOfRange { match_id, score } => {
                write!(f, "match {match_id} has an invalid score {score}")
            }
            LeagueError::MissingTeam { team_id } => write!(f, "team {team_id} does not exist"),
            LeagueError::SameTeam { team_id } => {
                write!(f, "team {team_id} cannot play against itself")
            }
            LeagueError::TeamNotInGroup { team_id, group } => {
                write!(f, "team {team_id} is not in group {group}")
            }
            LeagueError::AlreadyPlayed { home, away } => {
                write!(f, "teams {home} and {away} have already played each other")
            }
        }
    }
}

impl std::error::Error for LeagueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_labels_are_normalised() {
        assert_eq!(GroupLabel::new(" a "), GroupLabel::from("A"));
        assert_eq!(GroupLabel::new("b").to_string(), "B");
    }

    #[test]
    fn match_state_rejects_half_scores() {
        assert_eq!(MatchState::from_scores(None, None), Some(MatchState::Scheduled));
        assert_eq!(
            MatchState::from_scores(Some(2), Some(0)),
            Some(MatchState::Completed { home: 2, away: 0 })
        );
        assert_eq!(MatchState::from_scores(Some(1), None), None);
        assert_eq!(MatchState::from_scores(None, Some(1)), None);
    }

    #[test]
    fn outcome_follows_scores() {
        let mut m = Match { state: MatchState::Completed { home: 1, away: 3 }, ..Default::default() };
        assert_eq!(m.outcome(), Some(Outcome::AwayWin));
        m.state = MatchState::Completed { home: 2, away: 2 };
        assert_eq!(m.outcome(), Some(Outcome::Draw));
        m.state = MatchState::Scheduled;
        assert_eq!(m.outcome(), None);
    }

    #[test]
    fn is_between_ignores_orientation() {
        let m = Match { home_team_id: 4, away_team_id: 9, ..Default::default() };
        assert!(m.is_between(4, 9));
        assert!(m.is_between(9, 4));
        assert!(!m.is_between(4, 5));
    }

    #[test]
    fn seed_row_derives_goal_difference() {
        let team = Team { id: 1, name: "Halcones".into(), ..Default::default() };
        let seed = SeedStanding { team_id: 1, goals_for: 4, goals_against: 9, ..Default::default() };
        let row = StandingsRow::from_seed(&team, Some(&seed));
        assert_eq!(row.goal_difference, -5);
        assert_eq!(StandingsRow::from_seed(&team, None).goal_difference, 0);
    }

    #[test]
    fn record_applies_scoring_rules() {
        let team = Team { id: 1, name: "Halcones".into(), ..Default::default() };
        let rules = ScoringRules { win: 3, draw: 1, loss: 0 };
        let mut row = StandingsRow::from_seed(&team, None);
        row.record(2, 0, &rules);
        row.record(1, 1, &rules);
        row.record(0, 4, &rules);
        assert_eq!((row.wins, row.draws, row.losses), (1, 1, 1));
        assert_eq!(row.points, 4);
        assert_eq!(row.played, 3);
        assert_eq!(row.goal_difference, -2);
    }

    #[test]
    fn unknown_team_name_falls_back() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.team_name(42), "??");
    }
}
