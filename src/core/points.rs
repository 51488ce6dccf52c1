use crate::core::{MatchPoints, MatchRecord, ScoringRules};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Points each side takes from a single match.
pub fn match_points(record: &MatchRecord, rules: &ScoringRules) -> MatchPoints {
    match record
        .home_goals_full_time
        .cmp(&record.away_goals_full_time)
    {
        Ordering::Greater => MatchPoints {
            home: rules.win,
            away: rules.loss,
        },
        Ordering::Equal => MatchPoints {
            home: rules.draw,
            away: rules.draw,
        },
        Ordering::Less => MatchPoints {
            home: rules.loss,
            away: rules.win,
        },
    }
}

/// Returns the records with `points` populated.
pub fn annotate_points(records: Vec<MatchRecord>, rules: &ScoringRules) -> Vec<MatchRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.points = Some(match_points(&record, rules));
            record
        })
        .collect()
}

/// Points of a record, scoring it on the fly if it was never annotated.
pub(crate) fn points_or_score(record: &MatchRecord, rules: &ScoringRules) -> MatchPoints {
    record
        .points
        .unwrap_or_else(|| match_points(record, rules))
}

/// Season point totals per team, highest first.
///
/// Home points are summed over the matches a team hosted, away points over
/// the matches it visited. Equal totals are ordered by team name.
pub fn season_points(records: &[MatchRecord], rules: &ScoringRules) -> Vec<(String, u32)> {
    let mut totals: HashMap<&str, u32> = HashMap::new();

    for record in records {
        let points = points_or_score(record, rules);
        *totals.entry(record.home_team.as_str()).or_insert(0) += points.home;
        *totals.entry(record.away_team.as_str()).or_insert(0) += points.away;
    }

    let mut ranked: Vec<(String, u32)> = totals
        .into_iter()
        .map(|(team, points)| (team.to_string(), points))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
