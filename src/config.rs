//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeplot/treeplot.toml`
//! 3. Local config: `<project_dir>/.treeplot.toml`
//! 4. Environment variables: `TREEPLOT_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{LayoutConfig, DEFAULT_STEP};

/// Layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Vertical distance between levels, in layout units
    pub step: f64,
    /// Remove blank-label nodes before layout
    pub prune_blank: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            prune_blank: true,
        }
    }
}

impl LayoutSettings {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig { step: self.step }
    }
}

/// Drawing configuration for the SVG renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    /// Pixels per layout unit
    pub scale: f64,
    /// Node circle radius, in layout units
    pub radius: f64,
    /// Label font size in pixels
    pub font_size: f64,
    /// Padding around the drawing, in layout units
    pub margin: f64,
    /// Canvas fill
    pub background: String,
    /// Outline and connector color
    pub stroke: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 40.0,
            radius: 0.5,
            font_size: 8.0,
            margin: 1.0,
            background: "white".into(),
            stroke: "black".into(),
        }
    }
}

/// Raw layout config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub step: Option<f64>,
    pub prune_blank: Option<bool>,
}

/// Raw render config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub scale: Option<f64>,
    pub radius: Option<f64>,
    pub font_size: Option<f64>,
    pub margin: Option<f64>,
    pub background: Option<String>,
    pub stroke: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub output_dir: Option<PathBuf>,
    pub layout: RawLayoutSettings,
    pub render: RawRenderSettings,
}

/// Unified configuration for treeplot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory diagrams are written to (default: current directory)
    pub output_dir: PathBuf,
    pub layout: LayoutSettings,
    pub render: RenderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            layout: LayoutSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

/// Get the XDG config directory for treeplot.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeplot").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeplot.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".treeplot.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let layout = &overlay.layout;
        let render = &overlay.render;
        Self {
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            layout: LayoutSettings {
                step: layout.step.unwrap_or(self.layout.step),
                prune_blank: layout.prune_blank.unwrap_or(self.layout.prune_blank),
            },
            render: RenderSettings {
                scale: render.scale.unwrap_or(self.render.scale),
                radius: render.radius.unwrap_or(self.render.radius),
                font_size: render.font_size.unwrap_or(self.render.font_size),
                margin: render.margin.unwrap_or(self.render.margin),
                background: render
                    .background
                    .clone()
                    .unwrap_or_else(|| self.render.background.clone()),
                stroke: render
                    .stroke
                    .clone()
                    .unwrap_or_else(|| self.render.stroke.clone()),
            },
        }
    }

    /// Expand `~` and `$VAR` in path-like fields.
    fn expand_paths(&mut self) {
        let raw = self.output_dir.to_string_lossy().into_owned();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        self.output_dir = PathBuf::from(expanded);
    }

    /// Reject values the layout engine or renderer cannot work with.
    fn validate(&self) -> Result<(), ApplicationError> {
        let positive = [
            ("layout.step", self.layout.step),
            ("render.scale", self.render.scale),
            ("render.radius", self.render.radius),
            ("render.font_size", self.render.font_size),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ApplicationError::Config {
                    message: format!("{} must be positive, got {}", key, value),
                });
            }
        }
        if !(self.render.margin.is_finite() && self.render.margin >= 0.0) {
            return Err(ApplicationError::Config {
                message: format!("render.margin must not be negative, got {}", self.render.margin),
            });
        }
        Ok(())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.treeplot.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treeplot/treeplot.toml`
    /// 3. Local config: `<project_dir>/.treeplot.toml`
    /// 4. Environment variables: `TREEPLOT_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = current.apply_local(project_dir)?;
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Load defaults plus the local config only (no global file, no env vars).
    pub fn load_local_only(project_dir: &Path) -> Result<Self, ApplicationError> {
        let mut settings = Self::default().apply_local(Some(project_dir))?;
        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    fn apply_local(self, project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                return Ok(self.merge_with(&raw));
            }
        }
        Ok(self)
    }

    /// Apply TREEPLOT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEPLOT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_string("output_dir"))? {
            settings.output_dir = PathBuf::from(val);
        }
        if let Some(val) = env_value(config.get_float("layout.step"))? {
            settings.layout.step = val;
        }
        if let Some(val) = env_value(config.get_bool("layout.prune_blank"))? {
            settings.layout.prune_blank = val;
        }
        if let Some(val) = env_value(config.get_float("render.scale"))? {
            settings.render.scale = val;
        }
        if let Some(val) = env_value(config.get_float("render.radius"))? {
            settings.render.radius = val;
        }
        if let Some(val) = env_value(config.get_float("render.font_size"))? {
            settings.render.font_size = val;
        }
        if let Some(val) = env_value(config.get_float("render.margin"))? {
            settings.render.margin = val;
        }
        if let Some(val) = env_value(config.get_string("render.background"))? {
            settings.render.background = val;
        }
        if let Some(val) = env_value(config.get_string("render.stroke"))? {
            settings.render.stroke = val;
        }

        Ok(settings)
    }

    /// Render settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }

    /// Commented template written by `config init`.
    pub fn template() -> String {
        let defaults = Self::default();
        format!(
            r#"# treeplot configuration

# Directory diagrams are written to
# output_dir = "{}"

[layout]
# Vertical distance between levels
# step = {:?}
# Remove blank-label nodes before layout
# prune_blank = {}

[render]
# Pixels per layout unit
# scale = {:?}
# Node radius in layout units
# radius = {:?}
# font_size = {:?}
# margin = {:?}
# background = "{}"
# stroke = "{}"
"#,
            defaults.output_dir.display(),
            defaults.layout.step,
            defaults.layout.prune_blank,
            defaults.render.scale,
            defaults.render.radius,
            defaults.render.font_size,
            defaults.render.margin,
            defaults.render.background,
            defaults.render.stroke,
        )
    }
}

/// Unset variables are `None`; values that do not parse are errors.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
