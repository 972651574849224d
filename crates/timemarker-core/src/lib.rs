mod app_config;
mod config;
mod coordinate;
mod locale;
mod query;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use coordinate::{
    Coordinate, CoordinateError, CoordinateResolver, LocationError, LocationNotice, LocationSource,
};
pub use locale::Locale;
pub use query::{LocationLabel, NarrativeResult, TravelQuery};
