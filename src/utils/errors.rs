use std::io;
use thiserror::Error;

use crate::components::rocket::ComponentId;
use crate::resources::ConfigError;

#[derive(Error, Debug)]
pub enum AeroError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("No aerodynamic strategy registered for component {id} ({name})")]
    MissingStrategy { id: ComponentId, name: String },

    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    #[error("Invalid aerodynamic table: {0}")]
    InvalidTable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type AeroResult<T> = Result<T, AeroError>;
