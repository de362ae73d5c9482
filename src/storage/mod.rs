mod environment;
mod io;
mod models;
mod project;

use std::path::PathBuf;

use thiserror::Error;

pub use environment::{find_by_name, load_environments, Environment};
pub use io::load_groups;
pub use models::{Group, Request, RequestData};
pub use project::{find_project_root, PROJECT_DIR_NAME};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("reading directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
