use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://router.project-osrm.org";
pub const DEFAULT_PROFILE: &str = "driving";

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1")]
    Version1 {
        #[serde(default = "default_start")]
        start: PathBuf,
        #[serde(default = "default_end")]
        end: PathBuf,
        #[serde(default)]
        output: OutputConfig,
        #[serde(default)]
        backend: BackendConfig,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output")]
    pub path: PathBuf,
    #[serde(default)]
    pub mode: OutputMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output(),
            mode: OutputMode::default(),
        }
    }
}

/// What happens to an existing output file when a run starts.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    #[serde(rename = "truncate")]
    Truncate,
    /// Keep prior rows. Running twice yields the matrix twice.
    #[serde(rename = "append")]
    Append,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: Url,
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            profile: default_profile(),
        }
    }
}

fn default_start() -> PathBuf {
    PathBuf::from("start.csv")
}

fn default_end() -> PathBuf {
    PathBuf::from("end.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("distances.csv")
}

fn default_backend_url() -> Url {
    Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid")
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let yaml = r#"
version: "1"
start: data/start.csv
end: data/end.csv
output:
  path: out/distances.csv
  mode: append
backend:
  url: http://localhost:5000
  profile: car
"#;
        let Config::Version1 { start, end, output, backend } = serde_yml::from_str(yaml).unwrap();
        assert_eq!(PathBuf::from("data/start.csv"), start);
        assert_eq!(PathBuf::from("data/end.csv"), end);
        assert_eq!(PathBuf::from("out/distances.csv"), output.path);
        assert_eq!(OutputMode::Append, output.mode);
        assert_eq!("http://localhost:5000/", backend.url.as_str());
        assert_eq!("car", backend.profile);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let Config::Version1 { start, end, output, backend } =
            serde_yml::from_str("version: \"1\"\n").unwrap();
        assert_eq!(PathBuf::from("start.csv"), start);
        assert_eq!(PathBuf::from("end.csv"), end);
        assert_eq!(PathBuf::from("distances.csv"), output.path);
        assert_eq!(OutputMode::Truncate, output.mode);
        assert_eq!("http://router.project-osrm.org/", backend.url.as_str());
        assert_eq!("driving", backend.profile);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        assert!(serde_yml::from_str::<Config>("version: \"2\"\n").is_err());
    }

    #[test]
    fn test_unknown_output_mode_is_rejected() {
        let yaml = "version: \"1\"\noutput:\n  mode: overwrite\n";
        assert!(serde_yml::from_str::<Config>(yaml).is_err());
    }
}
