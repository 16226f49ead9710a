//! Schedule and roster views derived from a snapshot. Every function here is
//! pure and returns an empty collection when nothing qualifies.

use crate::{GroupLabel, LeagueError, LeagueResult, Match, Snapshot, Team, TeamId};
use chrono::{NaiveDate, TimeZone};
use std::collections::{BTreeMap, BTreeSet};

/// Matches played on one calendar date, in kick-off order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDay<'a> {
    pub date: NaiveDate,
    pub matches: Vec<&'a Match>,
}

/// Group matches by calendar date in `tz`. Matches with no timestamp are
/// left out.
pub fn matches_by_day<'a, Tz: TimeZone>(matches: &'a [Match], tz: &Tz) -> Vec<MatchDay<'a>> {
    let mut days: BTreeMap<NaiveDate, Vec<&'a Match>> = BTreeMap::new();
    for m in matches {
        let Some(at) = m.scheduled_at else {
            continue;
        };
        let date = at.with_timezone(tz).date_naive();
        days.entry(date).or_default().push(m);
    }

    days.into_iter()
        .map(|(date, mut matches)| {
            matches.sort_by_key(|m| (m.scheduled_at, m.id));
            MatchDay { date, matches }
        })
        .collect()
}

/// Distinct week numbers, ascending.
pub fn available_weeks(matches: &[Match]) -> Vec<u32> {
    matches
        .iter()
        .filter_map(|m| m.week)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The latest week, which the schedule opens on.
pub fn default_week(matches: &[Match]) -> Option<u32> {
    matches.iter().filter_map(|m| m.week).max()
}

/// Matches of `week`, or all of them when no week is selected.
pub fn matches_in_week(matches: &[Match], week: Option<u32>) -> Vec<&Match> {
    match week {
        Some(week) => matches.iter().filter(|m| m.week == Some(week)).collect(),
        None => matches.iter().collect(),
    }
}

/// Completed matches of one team, oldest first. Undated matches sort first.
pub fn team_history(matches: &[Match], team_id: TeamId) -> Vec<&Match> {
    let mut history: Vec<&Match> = matches
        .iter()
        .filter(|m| m.involves(team_id) && m.is_completed())
        .collect();
    history.sort_by_key(|m| (m.scheduled_at, m.id));
    history
}

pub fn has_completed_meeting(matches: &[Match], a: TeamId, b: TeamId) -> bool {
    matches.iter().any(|m| m.is_completed() && m.is_between(a, b))
}

/// Teams of `group` the selected team may still be scheduled against.
/// Without a selection every team of the group is returned.
pub fn eligible_opponents<'a>(
    teams: &'a [Team],
    matches: &[Match],
    group: &GroupLabel,
    selected: Option<TeamId>,
) -> Vec<&'a Team> {
    teams
        .iter()
        .filter(|t| &t.group == group)
        .filter(|t| match selected {
            Some(selected) => t.id != selected && !has_completed_meeting(matches, selected, t.id),
            None => true,
        })
        .collect()
}

pub fn roster_by_group(teams: &[Team]) -> BTreeMap<GroupLabel, Vec<&Team>> {
    let mut groups: BTreeMap<GroupLabel, Vec<&Team>> = BTreeMap::new();
    for team in teams {
        groups.entry(team.group.clone()).or_default().push(team);
    }
    for roster in groups.values_mut() {
        roster.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.name.cmp(&b.name)));
    }
    groups
}

/// Check a new fixture before it is created: both teams exist, differ,
/// belong to `group` and have not already met with a result.
pub fn validate_fixture(
    snapshot: &Snapshot,
    group: &GroupLabel,
    home: TeamId,
    away: TeamId,
) -> LeagueResult<()> {
    if home == away {
        return Err(LeagueError::SameTeam { team_id: home });
    }
    for team_id in [home, away] {
        let team = snapshot
            .team(team_id)
            .ok_or(LeagueError::MissingTeam { team_id })?;
        if &team.group != group {
            return Err(LeagueError::TeamNotInGroup { team_id, group: group.clone() });
        }
    }
    if has_completed_meeting(&snapshot.matches, home, away) {
        return Err(LeagueError::AlreadyPlayed { home, away });
    }
    Ok(())
}
