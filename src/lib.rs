pub mod blend;
pub mod error;
pub mod loader;
pub mod model;
pub mod model_params;
pub mod projection;
pub mod rate_volume;
pub mod report;
pub mod scorer;
pub mod stat_parse;
pub mod weather;

pub use error::{OutOfRangeWarning, ProjectionError};
pub use model::{GameContext, ProjectionResult, Side, TeamProfile};
pub use model_params::ModelParams;
pub use projection::project_game;
