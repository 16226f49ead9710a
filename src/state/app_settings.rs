use evg_league::LeagueConfig;
use log::{LevelFilter, warn};
use std::time::Duration;

const ENV_LOG_LEVEL: &str = "EVG_LOG_LEVEL";
const ENV_REFRESH_SECS: &str = "EVG_REFRESH_SECS";
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub refresh_interval: Duration,
    pub league: LeagueConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            refresh_interval: DEFAULT_REFRESH,
            league: LeagueConfig::default(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        let log_level = std::env::var(ENV_LOG_LEVEL)
            .ok()
            .and_then(|raw| raw.trim().parse::<LevelFilter>().ok());

        let refresh_interval = match std::env::var(ENV_REFRESH_SECS) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("ignoring {ENV_REFRESH_SECS}={raw:?}");
                    DEFAULT_REFRESH
                }
            },
            Err(_) => DEFAULT_REFRESH,
        };

        Self {
            full_screen: false,
            log_level,
            refresh_interval,
            league: LeagueConfig::from_env(),
        }
    }
}
