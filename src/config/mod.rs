pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, ScoringRules};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "league-etl")]
#[command(about = "Build football league tables from football-data.co.uk season files")]
pub struct CliConfig {
    #[arg(long, default_value = "./data/raw")]
    pub raw_data_dir: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', required = true)]
    pub countries: Vec<String>,

    /// Seasons such as 18/19, 2018/2019 or 1819
    #[arg(long, value_delimiter = ',', required = true)]
    pub seasons: Vec<String>,

    /// Only include these teams (default: every team in the season file)
    #[arg(long, value_delimiter = ',')]
    pub teams: Vec<String>,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub formats: Vec<String>,

    #[arg(long, default_value = "4")]
    pub concurrency: usize,

    /// Bundle every output file into this ZIP archive
    #[arg(long)]
    pub zip: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn countries(&self) -> &[String] {
        &self.countries
    }

    fn seasons(&self) -> &[String] {
        &self.seasons
    }

    fn teams(&self) -> Option<&[String]> {
        if self.teams.is_empty() {
            None
        } else {
            Some(&self.teams)
        }
    }

    fn scoring(&self) -> ScoringRules {
        ScoringRules::default()
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn archive_name(&self) -> Option<&str> {
        self.zip.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("raw_data_dir", &self.raw_data_dir)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_countries("countries", &self.countries)?;
        validation::validate_seasons("seasons", &self.seasons)?;
        for team in &self.teams {
            validation::validate_non_empty_string("teams", team)?;
        }
        validation::validate_output_formats("formats", &self.formats)?;
        validation::validate_range("concurrency", self.concurrency, 1, 64)?;
        if let Some(zip) = &self.zip {
            validation::validate_path("zip", zip)?;
        }
        Ok(())
    }
}
