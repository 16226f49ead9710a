use log::warn;

const ENV_WIN_POINTS: &str = "EVG_WIN_POINTS";
const ENV_DRAW_POINTS: &str = "EVG_DRAW_POINTS";
const ENV_LOSS_POINTS: &str = "EVG_LOSS_POINTS";
const ENV_STRICT_REFERENCES: &str = "EVG_STRICT_REFERENCES";

/// Points awarded per result. Defaults to 2-1-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self { win: 2, draw: 1, loss: 0 }
    }
}

/// What to do with records that point at teams outside the roster, or
/// match records with only one score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Log a warning and leave the record out.
    #[default]
    Lenient,
    /// Fail the whole aggregation.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeagueConfig {
    pub scoring: ScoringRules,
    pub references: ReferencePolicy,
}

impl LeagueConfig {
    /// Defaults overridden by `EVG_WIN_POINTS`, `EVG_DRAW_POINTS`,
    /// `EVG_LOSS_POINTS` and `EVG_STRICT_REFERENCES`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ScoringRules::default();
        let points = |key: &str, default: u32| {
            let Some(raw) = lookup(key) else {
                return default;
            };
            raw.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!("ignoring {key}={raw:?}: not a non-negative integer");
                default
            })
        };

        let scoring = ScoringRules {
            win: points(ENV_WIN_POINTS, defaults.win),
            draw: points(ENV_DRAW_POINTS, defaults.draw),
            loss: points(ENV_LOSS_POINTS, defaults.loss),
        };

        let references = match lookup(ENV_STRICT_REFERENCES)
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("1" | "true" | "yes" | "on") => ReferencePolicy::Strict,
            _ => ReferencePolicy::Lenient,
        };

        Self { scoring, references }
    }
}
