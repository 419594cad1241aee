use crate::bootstrap_config::BootstrapConfig;
use common::types::config::Config;
use log::info;
use std::fmt::{self, Display};
use std::fs::read_to_string;
use std::io;
use std::path::Path;

pub(super) fn load_config(bootstrap_config: &BootstrapConfig) -> Result<Config, ConfigError> {
    let path: &Path = Path::new(&bootstrap_config.config_file);

    let contents = read_to_string(path)?;
    let config: Config = serde_yml::from_str(&contents)?;

    info!(target: "main", "Config read successfully from '{path:?}'");

    Ok(config)
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    Io(#[from] io::Error),
    Yaml(#[from] serde_yml::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err: &dyn Display = match self {
            ConfigError::Io(err) => err,
            ConfigError::Yaml(err) => err,
        };
        write!(f, "{}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap_config::LogLevel;
    use common::types::config::OutputMode;
    use std::io::Write;

    fn bootstrap(path: &Path) -> BootstrapConfig {
        BootstrapConfig {
            config_file: path.to_string_lossy().into_owned(),
            log_level: LogLevel::Off,
        }
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "version: \"1\"\nstart: s.csv\noutput:\n  mode: append\n").unwrap();

        let Config::Version1 { start, output, .. } = load_config(&bootstrap(file.path())).unwrap();
        assert_eq!(Path::new("s.csv"), start);
        assert_eq!(OutputMode::Append, output.mode);
    }

    #[test]
    fn test_load_config_file_every_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "version: \"1\"\nstart: jobs/start.csv\nend: jobs/end.csv\noutput:\n  path: out/matrix.csv\n  mode: append\nbackend:\n  url: http://localhost:5000\n  profile: bike\n"
        )
        .unwrap();

        let Config::Version1 { start, end, output, backend } = load_config(&bootstrap(file.path())).unwrap();
        assert_eq!(Path::new("jobs/start.csv"), start);
        assert_eq!(Path::new("jobs/end.csv"), end);
        assert_eq!(Path::new("out/matrix.csv"), output.path);
        assert_eq!(OutputMode::Append, output.mode);
        assert_eq!("http://localhost:5000/", backend.url.as_str());
        assert_eq!("bike", backend.profile);
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(&bootstrap(Path::new("/nonexistent/config.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "version: \"1\"\noutput: [1, 2]\n").unwrap();

        let err = load_config(&bootstrap(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
