pub mod etl;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod points;
pub mod table;

pub use crate::domain::model::{
    MatchPoints, MatchRecord, Role, ScoringRules, SeasonId, SeasonMatches, SeasonTable,
    SeasonUnit, TeamSeasonRow, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
