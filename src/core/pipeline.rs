use crate::core::loader::{load_season_matches, season_file_stem};
use crate::core::points::annotate_points;
use crate::core::table::SeasonTableBuilder;
use crate::core::{
    ConfigProvider, Pipeline, ScoringRules, SeasonId, SeasonMatches, SeasonTable, SeasonUnit,
    Storage, TeamSeasonRow, TransformResult,
};
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use zip::write::{FileOptions, ZipWriter};

pub const TABLES_BASENAME: &str = "league_tables";
pub const MATCHES_DIR: &str = "matches";

const TABLE_HEADER: [&str; 19] = [
    "country",
    "season",
    "team",
    "rank",
    "points",
    "home_points",
    "away_points",
    "home_points_share",
    "away_points_share",
    "goals",
    "home_goals",
    "away_goals",
    "home_goals_share",
    "away_goals_share",
    "goals_mean",
    "home_goals_mean",
    "away_goals_mean",
    "home_matches",
    "away_matches",
];

const MATCH_HEADER: [&str; 8] = [
    "Season",
    "Date",
    "HomeTeam",
    "AwayTeam",
    "FTHG",
    "FTAG",
    "home_points",
    "away_points",
];

/// Reads season files from `source`, builds one league table per
/// (country, season) and writes the results to `sink`.
pub struct LeaguePipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> LeaguePipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    pub fn units(&self) -> Result<Vec<SeasonUnit>> {
        let seasons = self
            .config
            .seasons()
            .iter()
            .map(|s| s.parse::<SeasonId>())
            .collect::<Result<Vec<_>>>()?;

        Ok(self
            .config
            .countries()
            .iter()
            .flat_map(|country| {
                seasons
                    .iter()
                    .map(move |season| SeasonUnit::new(country.clone(), season.clone()))
            })
            .collect())
    }

    fn wants(&self, format: &str) -> bool {
        self.config
            .output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }

    fn output_files(&self, result: &TransformResult) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        if self.wants("csv") {
            files.push((
                format!("{}.csv", TABLES_BASENAME),
                tables_delimited(&result.tables, b',')?,
            ));
            for season in &result.seasons {
                files.push((matches_file_name(season), matches_csv(season)?));
            }
        }
        if self.wants("tsv") {
            files.push((
                format!("{}.tsv", TABLES_BASENAME),
                tables_delimited(&result.tables, b'\t')?,
            ));
        }
        if self.wants("json") {
            files.push((
                format!("{}.json", TABLES_BASENAME),
                serde_json::to_vec_pretty(&result.tables)?,
            ));
        }

        Ok(files)
    }
}

/// Score every match and build the season's table.
pub fn aggregate_season(
    season: SeasonMatches,
    rules: ScoringRules,
    teams: Option<&[String]>,
) -> Result<(SeasonMatches, SeasonTable)> {
    let label = season.season.label();
    let matches = annotate_points(season.matches, &rules);

    let rows = SeasonTableBuilder::new(&matches)
        .teams(teams)
        .scoring(rules)
        .season_label(label.clone())
        .build()?;

    let table = SeasonTable {
        country: season.country.clone(),
        season: label,
        rows,
    };
    let season = SeasonMatches {
        country: season.country,
        season: season.season,
        extra_columns: season.extra_columns,
        matches,
    };
    Ok((season, table))
}

fn matches_file_name(season: &SeasonMatches) -> String {
    format!(
        "{}/{}.csv",
        MATCHES_DIR,
        season_file_stem(&season.country, &season.season)
    )
}

fn table_record(country: &str, row: &TeamSeasonRow) -> Vec<String> {
    vec![
        country.to_string(),
        row.season.clone(),
        row.team.clone(),
        row.rank.to_string(),
        row.points.to_string(),
        row.home_points.to_string(),
        row.away_points.to_string(),
        row.home_points_share.to_string(),
        row.away_points_share.to_string(),
        row.goals.to_string(),
        row.home_goals.to_string(),
        row.away_goals.to_string(),
        row.home_goals_share.to_string(),
        row.away_goals_share.to_string(),
        row.goals_mean.to_string(),
        row.home_goals_mean.to_string(),
        row.away_goals_mean.to_string(),
        row.home_matches.to_string(),
        row.away_matches.to_string(),
    ]
}

fn finish_writer(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

fn tables_delimited(tables: &[SeasonTable], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(TABLE_HEADER)?;
    for table in tables {
        for row in &table.rows {
            writer.write_record(table_record(&table.country, row))?;
        }
    }
    finish_writer(writer)
}

/// Canonical match table: fixed columns, then the source's pass-through columns.
fn matches_csv(season: &SeasonMatches) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = MATCH_HEADER
        .iter()
        .copied()
        .chain(season.extra_columns.iter().map(String::as_str))
        .collect();
    writer.write_record(&header)?;

    for record in &season.matches {
        let (home_points, away_points) = record
            .points
            .map(|p| (p.home.to_string(), p.away.to_string()))
            .unwrap_or_default();

        let mut fields = vec![
            record.season.clone(),
            record
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            record.home_team.clone(),
            record.away_team.clone(),
            record.home_goals_full_time.to_string(),
            record.away_goals_full_time.to_string(),
            home_points,
            away_points,
        ];
        fields.extend(record.extra.iter().cloned());
        writer.write_record(&fields)?;
    }
    finish_writer(writer)
}

fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LeaguePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SeasonMatches>> {
        let mut seasons = Vec::new();

        for unit in self.units()? {
            let path = unit.raw_data_path();
            tracing::debug!("Reading {} {} from {}", unit.country, unit.season, path);

            let data = self.source.read_file(&path).await?;
            let season = load_season_matches(&data, &unit)?;

            if season.matches.is_empty() {
                tracing::warn!("⚠️ {} {} has no matches", unit.country, unit.season);
            }
            seasons.push(season);
        }

        Ok(seasons)
    }

    async fn transform(&self, data: Vec<SeasonMatches>) -> Result<TransformResult> {
        let rules = self.config.scoring();
        let teams: Option<Vec<String>> = self.config.teams().map(|t| t.to_vec());
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency().max(1)));
        let mut tasks = JoinSet::new();

        // 每個賽季是獨立的純計算，可以平行處理
        for (index, season) in data.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| EtlError::TaskFailedError {
                    message: e.to_string(),
                })?;
            let teams = teams.clone();

            tasks.spawn_blocking(move || {
                let _permit = permit;
                aggregate_season(season, rules, teams.as_deref()).map(|out| (index, out))
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| EtlError::TaskFailedError {
                message: e.to_string(),
            })?;
            outcomes.push(outcome?);
        }
        outcomes.sort_by_key(|(index, _)| *index);

        let mut seasons = Vec::with_capacity(outcomes.len());
        let mut tables = Vec::with_capacity(outcomes.len());
        for (_, (season, table)) in outcomes {
            if let Some(leader) = table.rows.first() {
                tracing::info!(
                    "🏆 {} {}: {} leads with {} points",
                    table.country,
                    table.season,
                    leader.team,
                    leader.points
                );
            }
            seasons.push(season);
            tables.push(table);
        }

        Ok(TransformResult { seasons, tables })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let files = self.output_files(&result)?;
        if files.is_empty() {
            return Err(EtlError::ConfigError {
                message: "no output format selected".to_string(),
            });
        }

        if let Some(archive) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = zip_files(&files)?;
            self.sink.write_file(archive, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.sink.write_file(name, data).await?;
        }
        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &str) {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }

        async fn names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.files.lock().await.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files
                .get(path)
                .cloned()
                .ok_or_else(|| EtlError::SourceUnavailableError {
                    location: path.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        countries: Vec<String>,
        seasons: Vec<String>,
        teams: Option<Vec<String>>,
        formats: Vec<String>,
        archive: Option<String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                countries: vec!["Spain".to_string()],
                seasons: vec!["18/19".to_string()],
                teams: None,
                formats: vec!["csv".to_string(), "json".to_string()],
                archive: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn output_path(&self) -> &str {
            "test_output"
        }

        fn countries(&self) -> &[String] {
            &self.countries
        }

        fn seasons(&self) -> &[String] {
            &self.seasons
        }

        fn teams(&self) -> Option<&[String]> {
            self.teams.as_deref()
        }

        fn scoring(&self) -> ScoringRules {
            ScoringRules::default()
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn concurrency(&self) -> usize {
            2
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive.as_deref()
        }
    }

    const SPAIN_18_19: &str = "Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n\
SP1,19/08/18,Celta,Alaves,0,2,A\n\
SP1,17/08/18,Alaves,Barcelona,2,1,H\n\
SP1,18/08/18,Barcelona,Celta,3,3,D\n";

    async fn seeded_source() -> MockStorage {
        let source = MockStorage::default();
        source.put("spain/spain_18_19.csv", SPAIN_18_19).await;
        source
    }

    #[tokio::test]
    async fn test_units_cross_countries_and_seasons() {
        let mut config = MockConfig::new();
        config.countries.push("Italy".to_string());
        config.seasons.push("1920".to_string());
        let pipeline = LeaguePipeline::new(MockStorage::default(), MockStorage::default(), config);

        let units = pipeline.units().unwrap();
        assert_eq!(units.len(), 4);
        assert_eq!(units[0].raw_data_path(), "spain/spain_18_19.csv");
        assert_eq!(units[3].raw_data_path(), "italy/italy_19_20.csv");
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_source_unavailable() {
        let pipeline =
            LeaguePipeline::new(MockStorage::default(), MockStorage::default(), MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_extract_and_transform() {
        let pipeline =
            LeaguePipeline::new(seeded_source().await, MockStorage::default(), MockConfig::new());

        let seasons = pipeline.extract().await.unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].matches[0].home_team, "Alaves");

        let result = pipeline.transform(seasons).await.unwrap();
        assert_eq!(result.tables.len(), 1);
        assert!(result.seasons[0].matches.iter().all(|m| m.points.is_some()));

        let table = &result.tables[0];
        assert_eq!(table.season, "18/19");
        assert_eq!(table.rows[0].team, "Alaves");
        assert_eq!(table.rows[0].points, 6);
        assert_eq!(table.rows[1].rank, 2);
        assert_eq!(table.rows[2].rank, 2);
    }

    #[tokio::test]
    async fn test_transform_with_explicit_teams() {
        let mut config = MockConfig::new();
        config.teams = Some(vec!["Barcelona".to_string(), "Girona".to_string()]);
        let pipeline = LeaguePipeline::new(seeded_source().await, MockStorage::default(), config);

        let seasons = pipeline.extract().await.unwrap();
        let result = pipeline.transform(seasons).await.unwrap();
        let rows = &result.tables[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team, "Barcelona");
        assert_eq!(rows[1].team, "Girona");
        assert_eq!(rows[1].matches(), 0);
    }

    #[tokio::test]
    async fn test_load_writes_plain_files() {
        let sink = MockStorage::default();
        let pipeline = LeaguePipeline::new(seeded_source().await, sink.clone(), MockConfig::new());

        let seasons = pipeline.extract().await.unwrap();
        let result = pipeline.transform(seasons).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "test_output");
        assert_eq!(
            sink.names().await,
            vec![
                "league_tables.csv",
                "league_tables.json",
                "matches/spain_18_19.csv"
            ]
        );

        let csv_bytes = sink.get_file("league_tables.csv").await.unwrap();
        let csv_text = String::from_utf8(csv_bytes).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(lines.next().unwrap(), TABLE_HEADER.join(","));
        assert!(lines.next().unwrap().starts_with("Spain,18/19,Alaves,1,6,3,3,"));

        let matches_bytes = sink.get_file("matches/spain_18_19.csv").await.unwrap();
        let matches_text = String::from_utf8(matches_bytes).unwrap();
        assert!(matches_text
            .lines()
            .next()
            .unwrap()
            .ends_with("home_points,away_points,Div,FTR"));
        assert!(matches_text.contains("18/19,2018-08-17,Alaves,Barcelona,2,1,3,0,SP1,H"));

        let json_bytes = sink.get_file("league_tables.json").await.unwrap();
        let tables: Vec<SeasonTable> = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(tables[0].rows.len(), 3);
    }

    #[tokio::test]
    async fn test_load_bundles_zip_archive() {
        let sink = MockStorage::default();
        let mut config = MockConfig::new();
        config.archive = Some("tables.zip".to_string());
        config.formats = vec!["csv".to_string(), "tsv".to_string()];
        let pipeline = LeaguePipeline::new(seeded_source().await, sink.clone(), config);

        let seasons = pipeline.extract().await.unwrap();
        let result = pipeline.transform(seasons).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "test_output/tables.zip");
        assert_eq!(sink.names().await, vec!["tables.zip"]);

        let zip_bytes = sink.get_file("tables.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(
            file_names,
            vec![
                "league_tables.csv",
                "league_tables.tsv",
                "matches/spain_18_19.csv"
            ]
        );
    }

    #[tokio::test]
    async fn test_load_without_formats_fails() {
        let mut config = MockConfig::new();
        config.formats = vec![];
        let pipeline = LeaguePipeline::new(MockStorage::default(), MockStorage::default(), config);
        let result = TransformResult {
            seasons: vec![],
            tables: vec![],
        };
        assert!(pipeline.load(result).await.is_err());
    }
}
