//! Play style profiles.
//!
//! Each style carries [low, high] tendency ranges. An agent samples a
//! concrete value inside each range when it sits down, so two agents
//! with the same style still play slightly differently.

use std::{collections::BTreeMap, fmt, fs, path::Path};

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    LooseAggressive,
    LoosePassive,
    TightAggressive,
    TightPassive,
}

impl PlayStyle {
    pub const ALL: [PlayStyle; 4] = [
        PlayStyle::LooseAggressive,
        PlayStyle::LoosePassive,
        PlayStyle::TightAggressive,
        PlayStyle::TightPassive,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::LooseAggressive => "loose_aggressive",
            Self::LoosePassive => "loose_passive",
            Self::TightAggressive => "tight_aggressive",
            Self::TightPassive => "tight_passive",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "loose_aggressive" => Some(Self::LooseAggressive),
            "loose_passive" => Some(Self::LoosePassive),
            "tight_aggressive" => Some(Self::TightAggressive),
            "tight_passive" => Some(Self::TightPassive),
            _ => None,
        }
    }

    /// Conventional shorthand ("LAG", "TAG", ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::LooseAggressive => "LAG",
            Self::LoosePassive => "LP",
            Self::TightAggressive => "TAG",
            Self::TightPassive => "TP",
        }
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An inclusive [low, high] range a tendency is sampled from.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Range(pub f64, pub f64);

impl Range {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.0..=self.1)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StyleProfile {
    pub name: String,
    pub description: String,
    /// Fraction of hands played voluntarily.
    pub vpip: Range,
    /// Fraction of hands open-raised preflop.
    pub pfr: Range,
    pub three_bet: Range,
    /// Aggression factor, (bets + raises) / calls.
    pub af: Range,
    pub cbet: Range,
    pub fold_to_cbet: Range,
    /// Went-to-showdown frequency.
    pub wtsd: Range,
}

/// Partial profile used when merging user overrides over the defaults.
#[derive(Debug, Deserialize)]
struct ProfileOverride {
    name: Option<String>,
    description: Option<String>,
    vpip: Option<Range>,
    pfr: Option<Range>,
    three_bet: Option<Range>,
    af: Option<Range>,
    cbet: Option<Range>,
    fold_to_cbet: Option<Range>,
    wtsd: Option<Range>,
}

/// Caller-owned table mapping each style to its profile.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StyleTable {
    profiles: BTreeMap<PlayStyle, StyleProfile>,
}

impl Default for StyleTable {
    fn default() -> Self {
        let profiles = BTreeMap::from([
            (
                PlayStyle::LooseAggressive,
                StyleProfile {
                    name: "Loose Aggressive".to_string(),
                    description: "Plays many hands and plays them fast".to_string(),
                    vpip: Range(0.35, 0.50),
                    pfr: Range(0.25, 0.40),
                    three_bet: Range(0.08, 0.15),
                    af: Range(2.5, 4.0),
                    cbet: Range(0.60, 0.70),
                    fold_to_cbet: Range(0.30, 0.45),
                    wtsd: Range(0.30, 0.40),
                },
            ),
            (
                PlayStyle::LoosePassive,
                StyleProfile {
                    name: "Loose Passive".to_string(),
                    description: "Calls too much and rarely raises".to_string(),
                    vpip: Range(0.35, 0.55),
                    pfr: Range(0.10, 0.20),
                    three_bet: Range(0.03, 0.08),
                    af: Range(1.0, 1.8),
                    cbet: Range(0.40, 0.55),
                    fold_to_cbet: Range(0.45, 0.60),
                    wtsd: Range(0.40, 0.55),
                },
            ),
            (
                PlayStyle::TightAggressive,
                StyleProfile {
                    name: "Tight Aggressive".to_string(),
                    description: "Selective preflop, aggressive with strong hands".to_string(),
                    vpip: Range(0.18, 0.28),
                    pfr: Range(0.14, 0.22),
                    three_bet: Range(0.06, 0.12),
                    af: Range(2.0, 3.5),
                    cbet: Range(0.55, 0.70),
                    fold_to_cbet: Range(0.40, 0.55),
                    wtsd: Range(0.25, 0.35),
                },
            ),
            (
                PlayStyle::TightPassive,
                StyleProfile {
                    name: "Tight Passive".to_string(),
                    description: "Waits for premiums and avoids confrontation".to_string(),
                    vpip: Range(0.14, 0.24),
                    pfr: Range(0.08, 0.15),
                    three_bet: Range(0.02, 0.06),
                    af: Range(0.8, 1.5),
                    cbet: Range(0.35, 0.50),
                    fold_to_cbet: Range(0.45, 0.60),
                    wtsd: Range(0.35, 0.50),
                },
            ),
        ]);
        Self { profiles }
    }
}

impl StyleTable {
    pub fn profile(&self, style: PlayStyle) -> &StyleProfile {
        // Default covers every style; this only falls through for a
        // table deserialized with missing entries.
        self.profiles
            .get(&style)
            .or_else(|| self.profiles.get(&PlayStyle::TightAggressive))
            .or_else(|| self.profiles.values().next())
            .expect("style table has at least one profile")
    }

    /// Merges a JSON override table over the defaults. Unknown style
    /// keys and malformed profile entries are skipped with a warning.
    pub fn from_json_str(json: &str) -> Self {
        let mut table = Self::default();
        let parsed: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(err) => {
                warn!("style table json is invalid, using defaults: {err}");
                return table;
            }
        };
        let Some(entries) = parsed.as_object() else {
            warn!("style table json is not an object, using defaults");
            return table;
        };
        for (key, value) in entries {
            let Some(style) = PlayStyle::from_key(key) else {
                warn!("skipping unknown play style {key:?}");
                continue;
            };
            let overrides: ProfileOverride = match serde_json::from_value(value.clone()) {
                Ok(overrides) => overrides,
                Err(err) => {
                    warn!("skipping malformed profile for {key}: {err}");
                    continue;
                }
            };
            if let Some(profile) = table.profiles.get_mut(&style) {
                if let Some(name) = overrides.name {
                    profile.name = name;
                }
                if let Some(description) = overrides.description {
                    profile.description = description;
                }
                if let Some(vpip) = overrides.vpip {
                    profile.vpip = vpip;
                }
                if let Some(pfr) = overrides.pfr {
                    profile.pfr = pfr;
                }
                if let Some(three_bet) = overrides.three_bet {
                    profile.three_bet = three_bet;
                }
                if let Some(af) = overrides.af {
                    profile.af = af;
                }
                if let Some(cbet) = overrides.cbet {
                    profile.cbet = cbet;
                }
                if let Some(fold_to_cbet) = overrides.fold_to_cbet {
                    profile.fold_to_cbet = fold_to_cbet;
                }
                if let Some(wtsd) = overrides.wtsd {
                    profile.wtsd = wtsd;
                }
            }
        }
        table
    }

    /// Loads overrides from a JSON file, falling back to the defaults
    /// when the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match fs::read_to_string(path.as_ref()) {
            Ok(json) => Self::from_json_str(&json),
            Err(err) => {
                warn!("cannot read style table {}: {err}", path.as_ref().display());
                Self::default()
            }
        }
    }
}
