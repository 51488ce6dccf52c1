use crate::core::{MatchRecord, SeasonId, SeasonMatches, SeasonUnit};
use crate::utils::dates::parse_match_date;
use crate::utils::error::{EtlError, Result};
use std::cmp::Ordering;

/// Countries with a football-data.co.uk first division file, and its code.
pub const COUNTRY_LEAGUE_CODES: &[(&str, &str)] = &[
    ("SPAIN", "SP1"),
    ("ENGLAND", "E0"),
    ("ITALY", "I1"),
    ("PORTUGAL", "P1"),
    ("NETHERLANDS", "N1"),
    ("GERMANY", "D1"),
    ("FRANCE", "F1"),
];

const DATE_COLUMN: &str = "Date";
const HOME_TEAM_COLUMN: &str = "HomeTeam";
const AWAY_TEAM_COLUMN: &str = "AwayTeam";
const HOME_GOALS_COLUMN: &str = "FTHG";
const AWAY_GOALS_COLUMN: &str = "FTAG";

pub fn league_code(country: &str) -> Option<&'static str> {
    COUNTRY_LEAGUE_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(country.trim()))
        .map(|(_, code)| *code)
}

/// `{country}_{Y1}_{Y2}`, shared by raw files and per-season match tables.
pub fn season_file_stem(country: &str, season: &SeasonId) -> String {
    format!(
        "{}_{}_{}",
        country.trim().to_lowercase(),
        season.first,
        season.second
    )
}

/// Location of a season file relative to the raw data root.
pub fn raw_data_path(country: &str, season: &SeasonId) -> String {
    format!(
        "{}/{}.csv",
        country.trim().to_lowercase(),
        season_file_stem(country, season)
    )
}

impl SeasonUnit {
    pub fn new(country: impl Into<String>, season: SeasonId) -> Self {
        Self {
            country: country.into(),
            season,
        }
    }

    pub fn raw_data_path(&self) -> String {
        raw_data_path(&self.country, &self.season)
    }
}

struct ColumnLayout {
    date: usize,
    home_team: usize,
    away_team: usize,
    home_goals: usize,
    away_goals: usize,
    extra: Vec<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| EtlError::data_format(format!("missing required column '{}'", name)))
        };

        let date = find(DATE_COLUMN)?;
        let home_team = find(HOME_TEAM_COLUMN)?;
        let away_team = find(AWAY_TEAM_COLUMN)?;
        let home_goals = find(HOME_GOALS_COLUMN)?;
        let away_goals = find(AWAY_GOALS_COLUMN)?;
        let required = [date, home_team, away_team, home_goals, away_goals];
        let extra = (0..headers.len()).filter(|i| !required.contains(i)).collect();

        Ok(Self {
            date,
            home_team,
            away_team,
            home_goals,
            away_goals,
            extra,
        })
    }
}

fn parse_goals(value: &str, column: &str, line: usize) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        EtlError::data_format(format!(
            "line {}: '{}' is not a non-negative goal count in column {}",
            line, value, column
        ))
    })
}

fn parse_team(value: &str, column: &str, line: usize) -> Result<String> {
    if value.trim().is_empty() {
        return Err(EtlError::data_format(format!(
            "line {}: empty team name in column {}",
            line, column
        )));
    }
    Ok(value.to_string())
}

/// Missing dates sort after every dated match; ties go by home team name.
fn match_order(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.home_team.cmp(&b.home_team))
}

/// Parse one season file into match records.
///
/// Every record is stamped with the season label and the result is sorted
/// by date, then home team.
pub fn load_season_matches(data: &[u8], unit: &SeasonUnit) -> Result<SeasonMatches> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EtlError::data_format(format!("header: {}", e)))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();
    let layout = ColumnLayout::from_headers(&headers)?;
    let season_label = unit.season.label();

    let mut matches = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 1;
        let row = row.map_err(|e| EtlError::data_format(format!("line {}: {}", line, e)))?;

        if row.iter().all(|field| field.trim().is_empty()) {
            tracing::debug!("Skipping empty padding row at data line {}", line);
            continue;
        }

        let field = |i: usize| row.get(i).unwrap_or("");

        matches.push(MatchRecord {
            date: parse_match_date(field(layout.date)).map_err(|e| match e {
                EtlError::DataFormatError { message } => {
                    EtlError::data_format(format!("line {}: {}", line, message))
                }
                other => other,
            })?,
            season: season_label.clone(),
            home_team: parse_team(field(layout.home_team), HOME_TEAM_COLUMN, line)?,
            away_team: parse_team(field(layout.away_team), AWAY_TEAM_COLUMN, line)?,
            home_goals_full_time: parse_goals(field(layout.home_goals), HOME_GOALS_COLUMN, line)?,
            away_goals_full_time: parse_goals(field(layout.away_goals), AWAY_GOALS_COLUMN, line)?,
            extra: layout.extra.iter().map(|&i| field(i).to_string()).collect(),
            points: None,
        });
    }

    matches.sort_by(match_order);

    let extra_columns = layout.extra.iter().map(|&i| headers[i].clone()).collect();

    tracing::debug!(
        "Loaded {} matches for {} {}",
        matches.len(),
        unit.country,
        season_label
    );

    Ok(SeasonMatches {
        country: unit.country.clone(),
        season: unit.season.clone(),
        extra_columns,
        matches,
    })
}
