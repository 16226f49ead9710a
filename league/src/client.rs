use crate::config::ReferencePolicy;
use crate::supabase::{MatchRecord, SnapshotRecords, StandingRecord, TeamRecord};
use crate::{GroupLabel, LeagueError, LeagueResult, Match, MatchState, SeedStanding, Snapshot, Team};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const ENV_SUPABASE_URL: &str = "EVG_SUPABASE_URL";
const ENV_SUPABASE_ANON_KEY: &str = "EVG_SUPABASE_ANON_KEY";
const ENV_SNAPSHOT_JSON: &str = "EVG_SNAPSHOT_JSON";

/// Where snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// PostgREST endpoint of the hosted backend, read with the anonymous key.
    Rest { base_url: String, anon_key: String },
    /// Offline JSON document shaped like [`SnapshotRecords`].
    File(PathBuf),
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::Rest { base_url, .. } => f.write_str(base_url),
            SnapshotSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read-only client for the tournament tables.
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    timeout: Duration,
    source: SnapshotSource,
    policy: ReferencePolicy,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Invalid(LeagueError),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Invalid(e) => write!(f, "Invalid snapshot: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<LeagueError> for ApiError {
    fn from(e: LeagueError) -> Self {
        ApiError::Invalid(e)
    }
}

impl LeagueApi {
    pub fn new(source: SnapshotSource) -> Self {
        Self {
            client: Client::builder()
                .user_agent("evgtui/0.1 (terminal tournament dashboard)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            source,
            policy: ReferencePolicy::default(),
        }
    }

    /// `EVG_SNAPSHOT_JSON` wins when set; otherwise both `EVG_SUPABASE_URL`
    /// and `EVG_SUPABASE_ANON_KEY` are required.
    pub fn from_env() -> ApiResult<Self> {
        if let Ok(path) = std::env::var(ENV_SNAPSHOT_JSON)
            && !path.trim().is_empty()
        {
            return Ok(Self::new(SnapshotSource::File(PathBuf::from(path.trim()))));
        }

        let var = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ApiError::Other(format!("{key} is not set (or set {ENV_SNAPSHOT_JSON})")))
        };
        Ok(Self::new(SnapshotSource::Rest {
            base_url: var(ENV_SUPABASE_URL)?,
            anon_key: var(ENV_SUPABASE_ANON_KEY)?,
        }))
    }

    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &SnapshotSource {
        &self.source
    }

    /// Fetch teams, seed standings and matches and map them into a
    /// [`Snapshot`]. The three tables are read one after another, so a
    /// write landing in between can show up in one table only; the next
    /// fetch picks it up.
    pub async fn fetch_snapshot(&self) -> ApiResult<Snapshot> {
        let records = match &self.source {
            SnapshotSource::File(path) => read_snapshot_file(path)?,
            SnapshotSource::Rest { base_url, anon_key } => {
                let base = base_url.trim_end_matches('/');
                SnapshotRecords {
                    teams: self
                        .get(&format!("{base}/rest/v1/teams?select=id,name,group_label,logo_url"), anon_key)
                        .await?,
                    initial_standings: self
                        .get(&format!("{base}/rest/v1/initial_standings?select=*"), anon_key)
                        .await?,
                    matches: self
                        .get(
                            &format!("{base}/rest/v1/matches?select=*&order=match_datetime.asc"),
                            anon_key,
                        )
                        .await?,
                }
            }
        };

        let snapshot = build_snapshot(records, self.policy)?;
        debug!(
            "snapshot: {} teams, {} seeds, {} matches",
            snapshot.teams.len(),
            snapshot.seeds.len(),
            snapshot.matches.len()
        );
        Ok(snapshot)
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str, key: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .header("apikey", key)
            .bearer_auth(key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    warn!("{url} answered {}; treating the table as empty", e.status().map(|s| s.as_u16()).unwrap_or_default());
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// Load and map an offline snapshot file.
pub fn load_snapshot_file(path: &Path, policy: ReferencePolicy) -> ApiResult<Snapshot> {
    let records = read_snapshot_file(path)?;
    Ok(build_snapshot(records, policy)?)
}

fn read_snapshot_file(path: &Path) -> ApiResult<SnapshotRecords> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| ApiError::NotFound(format!("invalid snapshot json at {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Mapping: PostgREST rows -> domain types
// ---------------------------------------------------------------------------

/// Map wire records into a snapshot. Match records with a single score, a
/// missing team reference or an impossible score are dropped with a
/// warning, or fail the snapshot under [`ReferencePolicy::Strict`].
pub fn build_snapshot(records: SnapshotRecords, policy: ReferencePolicy) -> LeagueResult<Snapshot> {
    let teams = records.teams.into_iter().map(map_team).collect();
    let seeds = records.initial_standings.iter().map(map_seed).collect();

    let mut matches = Vec::with_capacity(records.matches.len());
    for record in records.matches {
        match map_match(record) {
            Ok(m) => matches.push(m),
            Err(e) if policy == ReferencePolicy::Strict => return Err(e),
            Err(e) => warn!("dropping match record: {e}"),
        }
    }

    Ok(Snapshot::new(teams, seeds, matches))
}

fn map_team(t: TeamRecord) -> Team {
    Team {
        id: t.id,
        name: t.name.unwrap_or_default(),
        group: GroupLabel::new(t.group_label.unwrap_or_default()),
        logo_ref: t.logo_url.filter(|url| !url.is_empty()),
    }
}

fn map_seed(s: &StandingRecord) -> SeedStanding {
    SeedStanding {
        team_id: s.team_id,
        points: counter(s.points),
        played: counter(s.played),
        wins: counter(s.wins),
        draws: counter(s.draws),
        losses: counter(s.losses),
        goals_for: counter(s.gf),
        goals_against: counter(s.ga),
    }
}

fn counter(value: Option<i64>) -> u32 {
    value.map_or(0, |v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
}

fn goals(match_id: u64, raw: Option<i64>) -> LeagueResult<Option<u16>> {
    raw.map(|score| u16::try_from(score).map_err(|_| LeagueError::ScoreOutOfRange { match_id, score }))
        .transpose()
}

fn map_match(m: MatchRecord) -> LeagueResult<Match> {
    let (Some(home_team_id), Some(away_team_id)) = (m.home_team, m.away_team) else {
        return Err(LeagueError::MissingReference { match_id: m.id });
    };
    let state = MatchState::from_scores(goals(m.id, m.home_score)?, goals(m.id, m.away_score)?)
        .ok_or(LeagueError::PartialScore { match_id: m.id })?;

    if let Some(played) = m.played
        && played != state.is_completed()
    {
        debug!("match {}: played flag {played} disagrees with its scores", m.id);
    }

    let scheduled_at = m.match_datetime.as_deref().and_then(|raw| {
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            warn!("match {}: unreadable match_datetime {raw:?}", m.id);
        }
        parsed
    });

    let week = m.week_number.and_then(|raw| {
        let week = u32::try_from(raw).ok();
        if week.is_none() {
            warn!("match {}: ignoring week number {raw}", m.id);
        }
        week
    });

    Ok(Match {
        id: m.id,
        group: GroupLabel::new(m.group_label.unwrap_or_default()),
        home_team_id,
        away_team_id,
        scheduled_at,
        week,
        state,
    })
}

/// RFC 3339 first; zone-less timestamps are read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
