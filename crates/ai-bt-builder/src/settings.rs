//! Builder settings, loaded from `.bt/builder.yaml`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// What to do when a child is attached to a decorator that already has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoratorPolicy {
    /// Overwrite the existing child; the displaced node stays in the tree's node map, unreachable.
    #[default]
    Replace,
    /// Fail with `AssemblyError::DecoratorOccupied`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderSettings {
    /// Copied into the compiled project.
    #[serde(default)]
    pub project_title: Option<String>,

    /// Project scope tag
    #[serde(default = "default_scope")]
    pub scope: String,

    #[serde(default)]
    pub decorator_policy: DecoratorPolicy,

    /// Realize each attached node from the behavior it wraps, unless an extension is registered
    /// under its name. When off, every node is looked up by name in the extensions and built-ins.
    #[serde(default = "default_bind_attached")]
    pub bind_attached_behaviors: bool,
}

fn default_scope() -> String {
    "tree".to_string()
}

fn default_bind_attached() -> bool {
    true
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            project_title: None,
            scope: default_scope(),
            decorator_policy: DecoratorPolicy::default(),
            bind_attached_behaviors: default_bind_attached(),
        }
    }
}

impl BuilderSettings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read builder settings from {}", path.display()))?;
        let settings: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse builder settings from {}", path.display()))?;
        Ok(settings)
    }

    /// Load from a project directory (looks for .bt/builder.yaml), falling back to defaults.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(".bt/builder.yaml");
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: BuilderSettings = serde_yaml::from_str("decorator_policy: reject\n").unwrap();
        assert_eq!(settings.decorator_policy, DecoratorPolicy::Reject);
        assert_eq!(settings.scope, "tree");
        assert!(settings.bind_attached_behaviors);
        assert_eq!(settings.project_title, None);
    }

    #[test]
    fn load_from_dir_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BuilderSettings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings, BuilderSettings::default());
    }

    #[test]
    fn load_from_dir_reads_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".bt")).unwrap();
        std::fs::write(
            dir.path().join(".bt/builder.yaml"),
            "project_title: patrol\nscope: agents\nbind_attached_behaviors: false\n",
        )
        .unwrap();

        let settings = BuilderSettings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings.project_title.as_deref(), Some("patrol"));
        assert_eq!(settings.scope, "agents");
        assert!(!settings.bind_attached_behaviors);
        assert_eq!(settings.decorator_policy, DecoratorPolicy::Replace);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builder.yaml");
        std::fs::write(&path, "decorator_policy: sometimes\n").unwrap();

        let err = BuilderSettings::load(&path).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse builder settings"));
    }
}
