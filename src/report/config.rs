//! Console report configuration.
//!
//! Loaded from YAML; every key is optional.
//!
//! ```rust
//! use mxunit::report::{ColorMode, ReportConfig};
//!
//! let config = ReportConfig::from_yaml_str("color: never\nshow_diffs: false\n").unwrap();
//! assert_eq!(config.color, ColorMode::Never);
//! assert!(!config.show_diffs);
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use termcolor::{Color, ColorChoice, ColorSpec};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl From<StyleColor> for Color {
    fn from(color: StyleColor) -> Self {
        match color {
            StyleColor::Black => Color::Black,
            StyleColor::Red => Color::Red,
            StyleColor::Green => Color::Green,
            StyleColor::Yellow => Color::Yellow,
            StyleColor::Blue => Color::Blue,
            StyleColor::Magenta => Color::Magenta,
            StyleColor::Cyan => Color::Cyan,
            StyleColor::White => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub color: Option<StyleColor>,
    pub bold: bool,
}

impl Style {
    pub const fn new(color: StyleColor, bold: bool) -> Self {
        Self {
            color: Some(color),
            bold,
        }
    }

    pub fn spec(&self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(self.color.map(Color::from)).set_bold(self.bold);
        spec
    }
}

/// Styles per report element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    pub suite: Style,
    pub test: Style,
    pub passed: Style,
    pub failure: Style,
    pub todo: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            suite: Style::new(StyleColor::Cyan, true),
            test: Style::new(StyleColor::White, true),
            passed: Style::new(StyleColor::Green, false),
            failure: Style::new(StyleColor::Red, false),
            todo: Style::new(StyleColor::Yellow, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub color: ColorMode,
    pub styles: Styles,
    /// Word diff under `toEqual` failures.
    pub show_diffs: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            styles: Styles::default(),
            show_diffs: true,
        }
    }
}

impl ReportConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "report config loaded");
        Ok(config)
    }

    /// Color choice for stdout. `auto` yields to `NO_COLOR` and to a
    /// non-terminal stdout.
    pub fn resolve_color(&self) -> ColorChoice {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        self.color_choice(no_color, atty::is(atty::Stream::Stdout))
    }

    fn color_choice(&self, no_color: bool, is_tty: bool) -> ColorChoice {
        match self.color {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if no_color || !is_tty => ColorChoice::Never,
            ColorMode::Auto => ColorChoice::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = ReportConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert!(config.show_diffs);
    }

    #[test]
    fn partial_styles_keep_other_defaults() {
        let config = ReportConfig::from_yaml_str(
            "styles:\n  failure:\n    color: magenta\n    bold: true\n",
        )
        .unwrap();
        assert_eq!(config.styles.failure, Style::new(StyleColor::Magenta, true));
        assert_eq!(config.styles.suite, Styles::default().suite);
    }

    #[test]
    fn unknown_color_mode_is_rejected() {
        assert!(matches!(
            ReportConfig::from_yaml_str("color: sometimes"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ReportConfig::from_path("/nonexistent/mxunit.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mxunit.yaml"));
    }

    #[test]
    fn auto_color_yields_to_environment() {
        let config = ReportConfig::default();
        assert_eq!(config.color_choice(true, true), ColorChoice::Never);
        assert_eq!(config.color_choice(false, false), ColorChoice::Never);
        assert_eq!(config.color_choice(false, true), ColorChoice::Auto);

        let forced = ReportConfig {
            color: ColorMode::Always,
            ..ReportConfig::default()
        };
        assert_eq!(forced.color_choice(true, false), ColorChoice::Always);
    }
}
