use {
    super::version::VersionInfo,
    std::{
        collections::BTreeMap,
        path::{Path, PathBuf},
    },
};

pub const ARTIFACTS_DIR: &str = "artifacts";
pub const DEFAULT_PACKAGE_MANAGER: &str = "dotnet";

/// Run-wide settings, fixed once the command line has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub for_prod: bool,
    /// Project or solution file handed to every package-manager command.
    pub project: Option<PathBuf>,
    pub package_manager: String,
    pub parameters: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            for_prod: false,
            project: None,
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
            parameters: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn configuration(&self) -> &'static str {
        if self.for_prod {
            "Release"
        } else {
            "Debug"
        }
    }

    /// Value of `name`, unless it is unset or blank.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Everything a target action may read.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub root: PathBuf,
    pub config: Config,
    pub version: VersionInfo,
}

impl BuildContext {
    pub fn new(root: impl Into<PathBuf>, config: Config, version: VersionInfo) -> Self {
        Self {
            root: root.into(),
            config,
            version,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join(ARTIFACTS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq};

    #[test]
    fn test_configuration() {
        let mut config = Config::default();
        assert_eq!(config.configuration(), "Debug");
        config.for_prod = true;
        assert_eq!(config.configuration(), "Release");
    }

    #[test]
    fn test_parameter_must_be_non_empty() {
        let mut config = Config::default();
        config
            .parameters
            .insert("source".to_string(), "https://example.org/v3".to_string());
        config
            .parameters
            .insert("api-key".to_string(), "  ".to_string());

        assert_eq!(config.parameter("source"), Some("https://example.org/v3"));
        assert_eq!(config.parameter("api-key"), None);
        assert_eq!(config.parameter("missing"), None);
    }
}
