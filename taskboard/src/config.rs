use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use tracing::*;
use taskboard_common::helpers::fs::secure_file;
use taskboard_common::{TaskboardConfig, TaskboardConfigStore};

pub fn load_config(path: &Path, secure: bool) -> Result<TaskboardConfig> {
    if secure {
        secure_file(path).context("Could not secure config")?;
    }

    let store: TaskboardConfigStore = Config::builder()
        .add_source(File::from(path))
        .add_source(Environment::with_prefix("TASKBOARD"))
        .build()
        .context("Could not load config")?
        .try_deserialize()
        .context("Could not parse config")?;

    let config = TaskboardConfig {
        store,
        paths_relative_to: path
            .parent()
            .context("Invalid config path")?
            .to_path_buf(),
    };

    info!("Using config: {path:?}");
    Ok(config)
}
