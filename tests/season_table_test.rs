use anyhow::Result;
use league_etl::core::filter::team_matches;
use league_etl::core::loader::load_season_matches;
use league_etl::core::points::{annotate_points, match_points, season_points};
use league_etl::core::SeasonUnit;
use league_etl::{season_table, EtlError, Role, ScoringRules, SeasonTableBuilder};

/// A short round-robin with a goalless side and a tie at the top.
const ROUND_ROBIN: &str = "Date,HomeTeam,AwayTeam,FTHG,FTAG,B365H\n\
03/09/2019,Ajax,PSV,2,2,1.9\n\
01/09/2019,Ajax,Twente,4,0,1.2\n\
01/09/2019,PSV,Emmen,0,0,1.3\n\
02/09/2019,Twente,Emmen,1,0,2.1\n\
05/09/2019,Emmen,Ajax,0,0,9.0\n\
04/09/2019,PSV,Twente,3,1,1.4\n";

fn load() -> Result<Vec<league_etl::MatchRecord>> {
    let unit = SeasonUnit::new("netherlands", "2019/2020".parse()?);
    let season = load_season_matches(ROUND_ROBIN.as_bytes(), &unit)?;
    Ok(annotate_points(season.matches, &ScoringRules::default()))
}

#[test]
fn test_loaded_season_is_ordered_and_labelled() -> Result<()> {
    let matches = load()?;
    let order: Vec<(&str, &str)> = matches
        .iter()
        .map(|m| (m.home_team.as_str(), m.away_team.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Ajax", "Twente"),
            ("PSV", "Emmen"),
            ("Twente", "Emmen"),
            ("Ajax", "PSV"),
            ("PSV", "Twente"),
            ("Emmen", "Ajax"),
        ]
    );
    assert!(matches.iter().all(|m| m.season == "2019/2020"));
    Ok(())
}

#[test]
fn test_every_match_awards_two_or_three_points() -> Result<()> {
    for record in load()? {
        let points = record.points.expect("annotated");
        assert_eq!(points, match_points(&record, &ScoringRules::default()));
        assert!([2, 3].contains(&(points.home + points.away)));
    }
    Ok(())
}

#[test]
fn test_table_matches_aggregator_totals() -> Result<()> {
    let matches = load()?;
    let rows = season_table(&matches, None)?;
    let totals = season_points(&matches, &ScoringRules::default());

    assert_eq!(rows.len(), totals.len());
    for (team, total) in &totals {
        let row = rows.iter().find(|r| &r.team == team).expect("team row");
        assert_eq!(row.points, *total);
        assert_eq!(row.points, row.home_points + row.away_points);
        assert_eq!(
            row.home_matches as usize,
            team_matches(&matches, team, Some(Role::Home)).len()
        );
        assert_eq!(
            row.matches() as usize,
            team_matches(&matches, team, None).len()
        );
    }
    Ok(())
}

#[test]
fn test_round_robin_standings() -> Result<()> {
    let matches = load()?;
    let rows = season_table(&matches, None)?;
    let standings: Vec<(&str, u32, u32)> = rows
        .iter()
        .map(|r| (r.team.as_str(), r.points, r.rank))
        .collect();

    // Ajax: W, D, D = 5; PSV: D, D, W = 5; Twente: L, W, L = 3; Emmen: D, L, D = 2
    assert_eq!(
        standings,
        vec![("Ajax", 5, 1), ("PSV", 5, 1), ("Twente", 3, 3), ("Emmen", 2, 4)]
    );

    let emmen = rows.iter().find(|r| r.team == "Emmen").unwrap();
    assert_eq!(emmen.goals, 0);
    assert_eq!(emmen.home_goals_share, 0.0);
    assert_eq!(emmen.away_goals_share, 0.0);
    assert_eq!(emmen.goals_mean, 0.0);
    assert_eq!((emmen.home_matches, emmen.away_matches), (1, 2));
    Ok(())
}

#[test]
fn test_builder_is_deterministic() -> Result<()> {
    let matches = load()?;
    let teams = vec!["Emmen".to_string(), "Ajax".to_string(), "Feyenoord".to_string()];
    let builder = SeasonTableBuilder::new(&matches).teams(Some(&teams));

    let first = builder.build()?;
    let second = builder.build()?;
    assert_eq!(first, second);

    let feyenoord = first.iter().find(|r| r.team == "Feyenoord").unwrap();
    assert_eq!(feyenoord.rank, 3);
    assert_eq!(feyenoord.points, 0);
    assert_eq!(feyenoord.matches(), 0);
    Ok(())
}

#[test]
fn test_empty_season_needs_team_list() {
    let err = season_table(&[], None).unwrap_err();
    assert!(matches!(err, EtlError::EmptySeasonError));
}
