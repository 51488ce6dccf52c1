use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points awarded per match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl ScoringRules {
    pub const WIN_POINTS: u32 = 3;
    pub const DRAW_POINTS: u32 = 1;
    pub const LOSS_POINTS: u32 = 0;
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            win: Self::WIN_POINTS,
            draw: Self::DRAW_POINTS,
            loss: Self::LOSS_POINTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPoints {
    pub home: u32,
    pub away: u32,
}

/// One played fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: Option<NaiveDate>,
    pub season: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals_full_time: u32,
    pub away_goals_full_time: u32,
    /// Pass-through source columns, aligned with `SeasonMatches::extra_columns`.
    pub extra: Vec<String>,
    /// Filled in by the points calculator.
    pub points: Option<MatchPoints>,
}

/// A team's side in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Home,
    Away,
}

impl FromStr for Role {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HOME" => Ok(Role::Home),
            "AWAY" => Ok(Role::Away),
            _ => Err(EtlError::ValidationError {
                message: format!("unknown role '{}', expected 'home' or 'away'", s),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Home => write!(f, "HOME"),
            Role::Away => write!(f, "AWAY"),
        }
    }
}

/// Two-part season identifier, e.g. `18/19` or `2018/2019`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeasonId {
    pub first: String,
    pub second: String,
}

impl SeasonId {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Result<Self> {
        let first = first.into();
        let second = second.into();
        let valid_part =
            |p: &str| (p.len() == 2 || p.len() == 4) && p.chars().all(|c| c.is_ascii_digit());

        if !valid_part(&first) || !valid_part(&second) || first.len() != second.len() {
            return Err(EtlError::InvalidConfigValueError {
                field: "season".to_string(),
                value: format!("{}/{}", first, second),
                reason: "expected two 2-digit or two 4-digit years".to_string(),
            });
        }

        Ok(Self { first, second })
    }

    /// The `YEAR1/YEAR2` label stamped on every record of the season.
    pub fn label(&self) -> String {
        format!("{}/{}", self.first, self.second)
    }
}

impl FromStr for SeasonId {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((first, second)) = s.split_once(|c: char| c == '/' || c == '-') {
            return SeasonId::new(first, second);
        }
        if s.len() == 4 && s.is_ascii() {
            return SeasonId::new(&s[..2], &s[2..]);
        }
        Err(EtlError::InvalidConfigValueError {
            field: "season".to_string(),
            value: s.to_string(),
            reason: "expected 'Y1/Y2', 'Y1-Y2' or a compact 'YYYY' such as 1819".to_string(),
        })
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}

/// One (country, season) unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeasonUnit {
    pub country: String,
    pub season: SeasonId,
}

/// The loaded match table of one season file.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonMatches {
    pub country: String,
    pub season: SeasonId,
    pub extra_columns: Vec<String>,
    pub matches: Vec<MatchRecord>,
}

/// One team's aggregated standing for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonRow {
    pub season: String,
    pub team: String,
    pub rank: u32,
    pub points: u32,
    pub home_points: u32,
    pub away_points: u32,
    pub home_points_share: f64,
    pub away_points_share: f64,
    pub goals: u32,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_goals_share: f64,
    pub away_goals_share: f64,
    pub goals_mean: f64,
    pub home_goals_mean: f64,
    pub away_goals_mean: f64,
    pub home_matches: u32,
    pub away_matches: u32,
}

impl TeamSeasonRow {
    /// Row for a team with no matches: every numeric field is zero.
    pub fn empty(season: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            team: team.into(),
            rank: 0,
            points: 0,
            home_points: 0,
            away_points: 0,
            home_points_share: 0.0,
            away_points_share: 0.0,
            goals: 0,
            home_goals: 0,
            away_goals: 0,
            home_goals_share: 0.0,
            away_goals_share: 0.0,
            goals_mean: 0.0,
            home_goals_mean: 0.0,
            away_goals_mean: 0.0,
            home_matches: 0,
            away_matches: 0,
        }
    }

    pub fn matches(&self) -> u32 {
        self.home_matches + self.away_matches
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTable {
    pub country: String,
    pub season: String,
    pub rows: Vec<TeamSeasonRow>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub seasons: Vec<SeasonMatches>,
    pub tables: Vec<SeasonTable>,
}

impl TransformResult {
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|t| t.rows.len()).sum()
    }
}
