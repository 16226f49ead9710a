use crate::config::{LeagueConfig, ReferencePolicy};
use crate::ranking;
use crate::{GroupLabel, LeagueError, LeagueResult, Match, SeedStanding, Snapshot, StandingsRow, TeamId};
use log::warn;
use std::collections::{BTreeMap, HashMap};

/// Per-group totals for one snapshot. Rows keep roster order; use
/// [`Standings::table`] for the ranked league table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    groups: BTreeMap<GroupLabel, Vec<StandingsRow>>,
}

impl Standings {
    pub fn labels(&self) -> impl Iterator<Item = &GroupLabel> {
        self.groups.keys()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&GroupLabel, &[StandingsRow])> {
        self.groups.iter().map(|(label, rows)| (label, rows.as_slice()))
    }

    /// Unranked rows of one group; empty for an unknown label.
    pub fn group(&self, label: &GroupLabel) -> &[StandingsRow] {
        self.groups.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// League table of one group, ordered by the table tie-break chain.
    pub fn table(&self, label: &GroupLabel) -> Vec<StandingsRow> {
        ranking::rank_table(self.group(label))
    }

    pub fn row(&self, team_id: TeamId) -> Option<&StandingsRow> {
        self.groups.values().flatten().find(|r| r.team_id == team_id)
    }

    /// Every team of every group in one list, for the statistical views.
    pub fn pool(&self) -> Vec<StandingsRow> {
        ranking::unified_pool(self.groups.values().map(Vec::as_slice))
    }
}

/// Fold seed rows and completed results into one row per team.
///
/// The result only depends on the set of matches, not their order, and is
/// rebuilt from scratch on every call. Matches naming a team outside the
/// match's group are skipped with a warning, or rejected under
/// [`ReferencePolicy::Strict`].
pub fn compute_standings(snapshot: &Snapshot, config: &LeagueConfig) -> LeagueResult<Standings> {
    let seeds = first_seed_per_team(&snapshot.seeds);

    let mut groups: BTreeMap<GroupLabel, Vec<StandingsRow>> = BTreeMap::new();
    let mut slots: HashMap<(GroupLabel, TeamId), usize> = HashMap::new();

    for team in &snapshot.teams {
        let rows = groups.entry(team.group.clone()).or_default();
        let key = (team.group.clone(), team.id);
        if slots.contains_key(&key) {
            warn!("team {} listed twice in group {}; keeping the first entry", team.id, team.group);
            continue;
        }
        slots.insert(key, rows.len());
        rows.push(StandingsRow::from_seed(team, seeds.get(&team.id).copied()));
    }

    for m in &snapshot.matches {
        let Some((home_goals, away_goals)) = m.score() else {
            continue;
        };

        let home = slots.get(&(m.group.clone(), m.home_team_id)).copied();
        let away = slots.get(&(m.group.clone(), m.away_team_id)).copied();
        let (Some(home), Some(away)) = (home, away) else {
            let missing = if home.is_none() { m.home_team_id } else { m.away_team_id };
            reject_dangling(m, missing, config.references)?;
            continue;
        };

        let Some(rows) = groups.get_mut(&m.group) else {
            continue;
        };
        rows[home].record(home_goals, away_goals, &config.scoring);
        rows[away].record(away_goals, home_goals, &config.scoring);
    }

    Ok(Standings { groups })
}

fn first_seed_per_team(seeds: &[SeedStanding]) -> HashMap<TeamId, &SeedStanding> {
    let mut out: HashMap<TeamId, &SeedStanding> = HashMap::new();
    for seed in seeds {
        out.entry(seed.team_id).or_insert(seed);
    }
    out
}

fn reject_dangling(m: &Match, team_id: TeamId, policy: ReferencePolicy) -> LeagueResult<()> {
    let err = LeagueError::UnknownTeam { match_id: m.id, team_id, group: m.group.clone() };
    match policy {
        ReferencePolicy::Strict => Err(err),
        ReferencePolicy::Lenient => {
            warn!("skipping result: {err}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchState, ScoringRules, Team};

    fn team(id: TeamId, name: &str, group: &str) -> Team {
        Team { id, name: name.into(), group: group.into(), logo_ref: None }
    }

    fn result(id: u64, group: &str, home: TeamId, away: TeamId, score: Option<(u16, u16)>) -> Match {
        Match {
            id,
            group: group.into(),
            home_team_id: home,
            away_team_id: away,
            state: score
                .map(|(home, away)| MatchState::Completed { home, away })
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    fn league(matches: Vec<Match>) -> Snapshot {
        Snapshot::new(
            vec![
                team(1, "Águilas", "A"),
                team(2, "Búhos", "A"),
                team(3, "Cóndores", "A"),
                team(4, "Delfines", "B"),
                team(5, "Escorpiones", "B"),
            ],
            vec![],
            matches,
        )
    }

    fn row(standings: &Standings, team_id: TeamId) -> StandingsRow {
        standings.row(team_id).cloned().expect("team should have a row")
    }

    #[test]
    fn decisive_result_updates_both_sides() {
        let snapshot = league(vec![result(1, "A", 1, 2, Some((3, 1)))]);
        let standings = compute_standings(&snapshot, &LeagueConfig::default()).unwrap();

        let a = row(&standings, 1);
        assert_eq!((a.played, a.wins, a.points), (1, 1, 2));
        assert_eq!((a.goals_for, a.goals_against, a.goal_difference), (3, 1, 2));

        let b = row(&standings, 2);
        assert_eq!((b.played, b.losses, b.points), (1, 1, 0));
        assert_eq!((b.goals_for, b.goals_against, b.goal_difference), (1, 3, -2));
    }

    #[test]
    fn draw_gives_each_side_draw_points() {
        let snapshot = league(vec![result(1, "A", 1, 2, Some((2, 2)))]);
        let standings = compute_standings(&snapshot, &LeagueConfig::default()).unwrap();
        for id in [1, 2] {
            let r = row(&standings, id);
            assert_eq!((r.draws, r.points, r.goal_difference), (1, 1, 0));
        }
    }

    #[test]
    fn unplayed_match_leaves_seed_untouched() {
        let mut snapshot = league(vec![result(1, "A", 1, 2, None)]);
        snapshot.seeds.push(SeedStanding {
            team_id: 1,
            points: 4,
            played: 2,
            wins: 2,
            goals_for: 5,
            goals_against: 1,
            ..Default::default()
        });
        let standings = compute_standings(&snapshot, &LeagueConfig::default()).unwrap();
        let a = row(&standings, 1);
        assert_eq!((a.points, a.played, a.wins), (4, 2, 2));
        assert_eq!(a.goal_difference, 4);
        assert_eq!(row(&standings, 2), StandingsRow::from_seed(&snapshot.teams[1], None));
    }

    #[test]
    fn results_accumulate_on_top_of_seed() {
        let mut snapshot = league(vec![result(1, "A", 2, 1, Some((0, 1)))]);
        snapshot.seeds.push(SeedStanding { team_id: 1, points: 2, played: 1, wins: 1, goals_for: 2, ..Default::default() });
        let standings = compute_standings(&snapshot, &LeagueConfig::default()).unwrap();
        let a = row(&standings, 1);
        assert_eq!((a.points, a.played, a.wins, a.goals_for), (4, 2, 2, 3));
    }

    #[test]
    fn first_seed_row_wins() {
        let mut snapshot = league(vec![]);
        snapshot.seeds.push(SeedStanding { team_id: 3, points: 6, ..Default::default() });
        snapshot.seeds.push(SeedStanding { team_id: 3, points: 99, ..Default::default() });
        let standings = compute_standings(&snapshot, &LeagueConfig::default()).unwrap();
        assert_eq!(row(&standings, 3).points, 6);
    }

    #[test]
    fn huge_seed_totals_saturate() {
        let mut snapshot = league(vec![result(1, "A", 1, 2, Some((1, 0)))]);
        snapshot.seeds.push(SeedStanding {
            team_id: 1,
            points: u32::MAX,
            played: u32::MAX,
            wins: u32::MAX,
            goals_for: u32::MAX,
            ..Default::default()
        });
        let config = LeagueConfig {
            scoring: ScoringRules { win: u32::MAX, draw: u32::MAX, loss: u32::MAX },
            ..Default::default()
        };
        let standings = compute_standings(&snapshot, &config).unwrap();
        let a = row(&standings, 1);
        assert_eq!((a.points, a.played, a.wins, a.goals_for), (u32::MAX, u32::MAX, u32::MAX, u32::MAX));
        assert_eq!(a.goal_difference, i64::from(u32::MAX));
        assert_eq!(row(&standings, 2).points, u32::MAX);
    }

    #[test]
    fn rows_are_partitioned_by_group() {
        let standings = compute_standings(&league(vec![]), &LeagueConfig::default()).unwrap();
        let labels: Vec<&str> = standings.labels().map(GroupLabel::as_str).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(standings.group(&"A".into()).len(), 3);
        assert_eq!(standings.group(&"B".into()).len(), 2);
        assert!(standings.group(&"C".into()).is_empty());
    }

    #[test]
    fn cross_group_result_is_skipped_when_lenient() {
        let snapshot = league(vec![
            result(1, "A", 1, 4, Some((5, 0))),
            result(2, "A", 1, 2, Some((1, 0))),
        ]);
        let standings = compute_standings(&snapshot, &LeagueConfig::default()).unwrap();
        assert_eq!(row(&standings, 1).played, 1);
        assert_eq!(row(&standings, 4).played, 0);
    }

    #[test]
    fn unknown_team_fails_when_strict() {
        let snapshot = league(vec![result(7, "B", 4, 42, Some((1, 1)))]);
        let config = LeagueConfig { references: ReferencePolicy::Strict, ..Default::default() };
        let err = compute_standings(&snapshot, &config).unwrap_err();
        assert_eq!(err, LeagueError::UnknownTeam { match_id: 7, team_id: 42, group: "B".into() });
    }

    #[test]
    fn unplayed_dangling_match_is_ignored_even_when_strict() {
        let snapshot = league(vec![result(7, "B", 4, 42, None)]);
        let config = LeagueConfig { references: ReferencePolicy::Strict, ..Default::default() };
        assert!(compute_standings(&snapshot, &config).is_ok());
    }

    fn sample_season() -> Vec<Match> {
        vec![
            result(1, "A", 1, 2, Some((3, 1))),
            result(2, "A", 2, 3, Some((0, 0))),
            result(3, "A", 3, 1, Some((2, 4))),
            result(4, "B", 4, 5, Some((1, 2))),
            result(5, "B", 5, 4, Some((3, 3))),
            result(6, "A", 1, 3, None),
            result(7, "A", 2, 1, Some((1, 1))),
        ]
    }

    #[test]
    fn each_match_hands_out_two_points_under_two_one_zero() {
        let matches = sample_season();
        let completed = matches.iter().filter(|m| m.is_completed()).count() as u32;
        let standings = compute_standings(&league(matches), &LeagueConfig::default()).unwrap();
        let total: u32 = standings.pool().iter().map(|r| r.points).sum();
        assert_eq!(total, 2 * completed);
    }

    #[test]
    fn points_follow_configured_rules() {
        let config = LeagueConfig {
            scoring: ScoringRules { win: 3, draw: 1, loss: 0 },
            ..Default::default()
        };
        let standings = compute_standings(&league(sample_season()), &config).unwrap();
        let a = row(&standings, 1);
        // 3-1 win, 4-2 win, 1-1 draw
        assert_eq!(a.points, 7);
    }

    #[test]
    fn goal_difference_invariant_holds() {
        let standings = compute_standings(&league(sample_season()), &LeagueConfig::default()).unwrap();
        for r in standings.pool() {
            assert_eq!(i64::from(r.goals_for) - i64::from(r.goals_against), r.goal_difference);
        }
    }

    #[test]
    fn match_order_does_not_matter() {
        let config = LeagueConfig::default();
        let forward = compute_standings(&league(sample_season()), &config).unwrap();

        let mut reversed = sample_season();
        reversed.reverse();
        assert_eq!(compute_standings(&league(reversed), &config).unwrap(), forward);

        let mut rotated = sample_season();
        for _ in 0..rotated.len() {
            rotated.rotate_left(1);
            assert_eq!(compute_standings(&league(rotated.clone()), &config).unwrap(), forward);
        }
    }

    #[test]
    fn recomputing_the_same_snapshot_is_idempotent() {
        let snapshot = league(sample_season());
        let config = LeagueConfig::default();
        let first = compute_standings(&snapshot, &config).unwrap();
        let second = compute_standings(&snapshot, &config).unwrap();
        assert_eq!(first, second);
    }
}
