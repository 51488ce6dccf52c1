use crate::core::{MatchRecord, Role};

/// Matches played by `team`, optionally restricted to one role.
///
/// Team names are compared exactly. Input order is kept and an
/// empty vector is returned when the team has no such match.
pub fn team_matches<'a>(
    records: &'a [MatchRecord],
    team: &str,
    role: Option<Role>,
) -> Vec<&'a MatchRecord> {
    records
        .iter()
        .filter(|record| match role {
            None => record.home_team == team || record.away_team == team,
            Some(Role::Home) => record.home_team == team,
            Some(Role::Away) => record.away_team == team,
        })
        .collect()
}
