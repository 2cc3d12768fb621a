use anyhow::{Context, Result};
use fieldmap::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "fieldmap.toml";

/// Configuration stored in fieldmap.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldmapConfig {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub tag: TagSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSettings {
    pub pattern: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dirs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    pub path: Option<String>,
    pub format: Option<OutputFormat>,
    pub package: Option<String>,
    pub var_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagSettings {
    pub key: Option<String>,
    #[serde(default)]
    pub strip_options: bool,
}

/// A parsed config file together with the directory its relative paths resolve against
pub struct LoadedConfig {
    pub path: PathBuf,
    pub base_dir: PathBuf,
    pub config: FieldmapConfig,
}

impl LoadedConfig {
    /// Load the config named on the command line, or `./fieldmap.toml` if it exists.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn find(explicit: Option<&Path>) -> Result<Option<Self>> {
        match explicit {
            Some(path) => Self::load(path).map(Some),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: FieldmapConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            config,
        })
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.base_dir.join(relative)
    }

    pub fn pattern(&self) -> Option<String> {
        self.config
            .input
            .pattern
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| self.resolve(pattern).to_string_lossy().into_owned())
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.config
            .input
            .files
            .iter()
            .map(|file| file.trim())
            .filter(|file| !file.is_empty())
            .map(|file| self.resolve(file))
            .collect()
    }

    pub fn dirs(&self) -> Vec<PathBuf> {
        self.config.input.dirs.iter().map(|dir| self.resolve(dir)).collect()
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.config.output.path.as_deref().map(|path| self.resolve(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FieldmapConfig::default();
        assert!(config.input.pattern.is_none());
        assert!(config.input.files.is_empty());
        assert!(!config.tag.strip_options);
    }

    #[test]
    fn test_config_parsing() {
        let config: FieldmapConfig = toml::from_str(
            r#"
[input]
pattern = "graph/model/*.go"
files = ["db/models.go"]

[output]
path = "generate/mapping.rs"
format = "rust"

[tag]
key = "db"
strip_options = true
"#,
        )
        .unwrap();
        assert_eq!(config.input.pattern.as_deref(), Some("graph/model/*.go"));
        assert_eq!(config.output.format, Some(OutputFormat::Rust));
        assert_eq!(config.tag.key.as_deref(), Some("db"));
        assert!(config.tag.strip_options);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<FieldmapConfig>("[input]\npatern = \"*.go\"\n").is_err());
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldmap.toml");
        std::fs::write(
            &path,
            "[input]\npattern = \"model/*.go\"\nfiles = [\" a.go \", \"\"]\ndirs = [\"pkg\"]\n\n[output]\npath = \"out/map.go\"\n",
        )
        .unwrap();

        let loaded = LoadedConfig::load(&path).unwrap();
        assert_eq!(loaded.pattern(), Some(dir.path().join("model/*.go").to_string_lossy().into_owned()));
        assert_eq!(loaded.files(), vec![dir.path().join("a.go")]);
        assert_eq!(loaded.dirs(), vec![dir.path().join("pkg")]);
        assert_eq!(loaded.output_path(), Some(dir.path().join("out/map.go")));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        assert!(LoadedConfig::find(Some(Path::new("/nonexistent/fieldmap.toml"))).is_err());
    }
}
