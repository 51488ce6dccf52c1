pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{etl::EtlEngine, pipeline::LeaguePipeline};
pub use core::table::{season_table, SeasonTableBuilder};
pub use domain::model::{MatchRecord, Role, ScoringRules, SeasonId, SeasonTable, TeamSeasonRow};
pub use utils::error::{EtlError, Result};
