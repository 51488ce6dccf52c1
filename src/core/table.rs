use crate::core::filter::team_matches;
use crate::core::points::{points_or_score, season_points};
use crate::core::{MatchRecord, Role, ScoringRules, TeamSeasonRow};
use crate::utils::error::{EtlError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Builds the league table of one season.
///
/// ```ignore
/// let rows = SeasonTableBuilder::new(&matches)
///     .teams(Some(&teams))
///     .scoring(ScoringRules::default())
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SeasonTableBuilder<'a> {
    records: &'a [MatchRecord],
    teams: Option<&'a [String]>,
    scoring: ScoringRules,
    season_label: Option<String>,
}

impl<'a> SeasonTableBuilder<'a> {
    pub fn new(records: &'a [MatchRecord]) -> Self {
        Self {
            records,
            teams: None,
            scoring: ScoringRules::default(),
            season_label: None,
        }
    }

    /// Restrict the table to these teams. `None` discovers them from the matches.
    pub fn teams(mut self, teams: Option<&'a [String]>) -> Self {
        self.teams = teams;
        self
    }

    /// Rules used for records that were never annotated with points.
    pub fn scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    /// Season label for the rows; must agree with the records' label.
    pub fn season_label(mut self, label: impl Into<String>) -> Self {
        self.season_label = Some(label.into());
        self
    }

    fn resolve_season_label(&self) -> Result<String> {
        let mut labels: BTreeSet<&str> = self.records.iter().map(|r| r.season.as_str()).collect();
        if let Some(explicit) = self.season_label.as_deref() {
            labels.insert(explicit);
        }

        if labels.len() > 1 {
            return Err(EtlError::MixedSeasonError {
                labels: labels.into_iter().map(String::from).collect(),
            });
        }
        Ok(labels.into_iter().next().unwrap_or_default().to_string())
    }

    fn resolve_teams(&self) -> Result<Vec<String>> {
        if let Some(teams) = self.teams {
            return Ok(teams.to_vec());
        }
        if self.records.is_empty() {
            return Err(EtlError::EmptySeasonError);
        }

        let mut seen = HashSet::new();
        let home = self.records.iter().map(|r| r.home_team.as_str());
        let away = self.records.iter().map(|r| r.away_team.as_str());
        Ok(home
            .chain(away)
            .filter(|team| seen.insert(*team))
            .map(String::from)
            .collect())
    }

    pub fn build(&self) -> Result<Vec<TeamSeasonRow>> {
        let season = self.resolve_season_label()?;
        let teams = self.resolve_teams()?;
        let totals: HashMap<String, u32> = season_points(self.records, &self.scoring)
            .into_iter()
            .collect();

        let mut rows: Vec<TeamSeasonRow> = teams
            .iter()
            .map(|team| self.team_row(&season, team, totals.get(team).copied().unwrap_or(0)))
            .collect();

        // 穩定排序：同分的隊伍保留發現順序
        rows.sort_by(|a, b| b.points.cmp(&a.points));
        assign_competition_ranks(&mut rows);

        tracing::debug!("Built season {} table with {} rows", season, rows.len());
        Ok(rows)
    }

    fn team_row(&self, season: &str, team: &str, total_points: u32) -> TeamSeasonRow {
        let home_matches = team_matches(self.records, team, Some(Role::Home));
        let away_matches = team_matches(self.records, team, Some(Role::Away));

        if home_matches.is_empty() && away_matches.is_empty() {
            return TeamSeasonRow::empty(season, team);
        }

        let home_points: u32 = home_matches
            .iter()
            .map(|m| points_or_score(m, &self.scoring).home)
            .sum();
        let away_points: u32 = away_matches
            .iter()
            .map(|m| points_or_score(m, &self.scoring).away)
            .sum();
        debug_assert_eq!(total_points, home_points + away_points);
        let points = total_points;

        let home_goals: u32 = home_matches.iter().map(|m| m.home_goals_full_time).sum();
        let away_goals: u32 = away_matches.iter().map(|m| m.away_goals_full_time).sum();
        let goals = home_goals + away_goals;

        let home_count = home_matches.len() as u32;
        let away_count = away_matches.len() as u32;

        TeamSeasonRow {
            season: season.to_string(),
            team: team.to_string(),
            rank: 0,
            points,
            home_points,
            away_points,
            home_points_share: ratio(home_points, points),
            away_points_share: ratio(away_points, points),
            goals,
            home_goals,
            away_goals,
            home_goals_share: ratio(home_goals, goals),
            away_goals_share: ratio(away_goals, goals),
            goals_mean: ratio(goals, home_count + away_count),
            home_goals_mean: ratio(home_goals, home_count),
            away_goals_mean: ratio(away_goals, away_count),
            home_matches: home_count,
            away_matches: away_count,
        }
    }
}

/// Zero whenever the denominator is zero.
fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole)
    }
}

/// Rows must already be sorted by points, highest first.
/// Equal points share a rank: 1 + the number of rows with more points.
fn assign_competition_ranks(rows: &mut [TeamSeasonRow]) {
    let mut rank = 1;
    let mut previous: Option<u32> = None;
    for (position, row) in rows.iter_mut().enumerate() {
        if previous != Some(row.points) {
            rank = position as u32 + 1;
            previous = Some(row.points);
        }
        row.rank = rank;
    }
}

/// League table for one season with the default scoring rules.
pub fn season_table(
    records: &[MatchRecord],
    teams: Option<&[String]>,
) -> Result<Vec<TeamSeasonRow>> {
    SeasonTableBuilder::new(records).teams(teams).build()
}
