use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::io::{find_dir, has_extension, list_files};
use super::StorageError;

const ENVIRONMENTS_DIR_NAME: &str = "environments";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

impl Environment {
    #[cfg(test)]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variables: BTreeMap::new(),
        }
    }

    /// Variables as `key = value` lines. Strings are shown without quotes.
    pub fn variable_lines(&self) -> Vec<String> {
        self.variables
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{} = {}", key, s),
                other => format!("{} = {}", key, other),
            })
            .collect()
    }
}

pub fn load_environment(path: &Path) -> Result<Environment, StorageError> {
    let contents = fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if has_extension(path, &["json"]) {
        serde_json::from_str(&contents).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&contents).map_err(|source| StorageError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn load_environments(data_dir: &Path) -> Result<Vec<Environment>, StorageError> {
    let dir = match find_dir(data_dir, ENVIRONMENTS_DIR_NAME)? {
        Some(dir) => dir,
        None => return Ok(Vec::new()),
    };

    let mut environments = Vec::new();
    for path in list_files(&dir, &["yaml", "yml", "json"])? {
        environments.push(load_environment(&path)?);
    }
    environments.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(environments)
}

/// Case-insensitive lookup by name.
pub fn find_by_name<'a>(environments: &'a [Environment], name: &str) -> Option<&'a Environment> {
    environments
        .iter()
        .find(|env| env.name.eq_ignore_ascii_case(name))
}
