use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::EngineConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_PATH: &str = "voxel.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

/// Loads the engine config from `$VOXEL_CONFIG`, else `voxel.json` if it exists, else
/// returns the defaults.
///
/// An explicitly named file that cannot be read is an error; a missing default file is not.
pub fn load_engine_config() -> Result<EngineConfig, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        log::info!("Loading config from {}", path.display());
        return load_config(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        log::info!("Loading config from {}", default_path.display());
        return load_config(default_path);
    }

    log::info!("No config file found, using defaults");
    Ok(EngineConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("voxel-sandbox-{}-{name}", std::process::id()));
        let mut file = File::create(&path).expect("create temp config");
        file.write_all(contents.as_bytes()).expect("write temp config");
        path
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = write_temp(
            "partial.json",
            r#"{ "chunk_radius": 3, "generator": { "kind": "perlin", "seed": 7, "scale": 0.05,
                "base_height": 8.0, "amplitude": 6.0, "lamp_chance": 0.01 } }"#,
        );
        let config: EngineConfig = load_config(&path).expect("valid config");
        std::fs::remove_file(&path).ok();

        assert_eq!(config.chunk_radius, 3);
        assert_eq!(config.place_block, "brick");
        assert_eq!(config.window.width, 640);
        assert!(matches!(config.generator, GeneratorConfig::Perlin { seed: 7, .. }));
    }

    #[test]
    fn defaults_match_the_flat_world() {
        let config = EngineConfig::default();
        assert_eq!(config.generator, GeneratorConfig::Flat { depth: 4 });
        assert_eq!(config.chunk_radius, 2);
        assert_eq!(config.ambient_light, 15);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let path = write_temp("broken.json", "{ chunk_radius: ");
        let result: Result<EngineConfig, ConfigError> = load_config(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result: Result<EngineConfig, ConfigError> =
            load_config("/definitely/not/here/voxel.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
