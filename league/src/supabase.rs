/// Wire types for the tournament's PostgREST tables.
/// Endpoint: {base}/rest/v1/{teams,initial_standings,matches}
use serde::Deserialize;

/// The three tables as one document. Also the layout of offline snapshot
/// files.
#[derive(Deserialize, Default, Debug)]
pub struct SnapshotRecords {
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
    #[serde(default)]
    pub initial_standings: Vec<StandingRecord>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct TeamRecord {
    pub id: u64,
    pub name: Option<String>,
    pub group_label: Option<String>,
    pub logo_url: Option<String>,
}

/// Columns are nullable in the table; nulls and negatives count as zero.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct StandingRecord {
    pub team_id: u64,
    pub points: Option<i64>,
    pub played: Option<i64>,
    pub wins: Option<i64>,
    pub draws: Option<i64>,
    pub losses: Option<i64>,
    pub gf: Option<i64>,
    pub ga: Option<i64>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct MatchRecord {
    pub id: u64,
    pub group_label: Option<String>,
    /// Null once the referenced team has been deleted.
    pub home_team: Option<u64>,
    pub away_team: Option<u64>,
    /// Wider than the domain score so out-of-range values reach the mapper.
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    /// Kept in sync by the admin panel; the scores are authoritative.
    pub played: Option<bool>,
    /// `timestamptz`, serialized as RFC 3339.
    pub match_datetime: Option<String>,
    pub week_number: Option<i64>,
}
