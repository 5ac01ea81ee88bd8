use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Load the given file, or fall back to built-in defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Log level the configuration asks for, read without logging so the logger
/// can be set up before the full load. Unreadable files fall back to the
/// default level and are reported by `load_config`.
pub fn configured_log_level(config_path: Option<&Path>) -> String {
    config_path
        .and_then(|path| File::open(path).ok())
        .and_then(|file| serde_yaml::from_reader::<_, Config>(file).ok())
        .unwrap_or_default()
        .log_level()
        .to_string()
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct DataOverrides {
    pub topology: Option<PathBuf>,
    pub trace: Option<PathBuf>,
    pub sat: Option<PathBuf>,
}

/// Apply CLI path overrides and re-validate
pub fn apply_overrides(config: &mut Config, overrides: &DataOverrides) -> Result<()> {
    if let Some(path) = &overrides.topology {
        info!("Topology path overridden: {:?}", path);
        config.data.topology = path.clone();
    }
    if let Some(path) = &overrides.trace {
        info!("Trace path overridden: {:?}", path);
        config.data.trace = path.clone();
    }
    if let Some(path) = &overrides.sat {
        info!("Satellite path overridden: {:?}", path);
        config.data.sat = path.clone();
    }

    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  topology: \"topo.csv\"\nclock:\n  step: \"2s\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.data.topology, PathBuf::from("topo.csv"));
        assert_eq!(config.clock.step.as_secs(), 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sampling:\n  interpolation_degree: 0").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/linkscope.yaml")).is_err());
        assert!(load_or_default(None).is_ok());
    }

    #[test]
    fn test_configured_log_level() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_level: debug\nclock:\n  step: \"1s\"").unwrap();
        assert_eq!(configured_log_level(Some(file.path())), "debug");

        let mut bare = NamedTempFile::new().unwrap();
        writeln!(bare, "clock:\n  step: \"1s\"").unwrap();
        assert_eq!(configured_log_level(Some(bare.path())), "info");
        assert_eq!(configured_log_level(Some(Path::new("/nonexistent/linkscope.yaml"))), "info");
        assert_eq!(configured_log_level(None), "info");
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let overrides = DataOverrides {
            trace: Some(PathBuf::from("other_trace.csv")),
            ..DataOverrides::default()
        };
        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.data.trace, PathBuf::from("other_trace.csv"));
        assert_eq!(config.data.sat, PathBuf::from("public/mock_sat.csv"));
    }
}
