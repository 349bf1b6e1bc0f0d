use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "spdf";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub export: ExportConfig,
    pub view: ViewConfig,
    pub keymap: KeymapConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RasterEncoding {
    #[default]
    Flate,
    Jpeg,
    Raw,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub default_scale: f64,
    pub encoding: RasterEncoding,
    pub jpeg_quality: u8,
    /// `0` keeps the raster at native resolution.
    pub max_dpi: f64,
    pub output_dir: String,
    pub file_suffix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_scale: 4.0,
            encoding: RasterEncoding::Flate,
            jpeg_quality: 90,
            max_dpi: 0.0,
            output_dir: String::new(),
            file_suffix: "-scaled".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn max_dpi(&self) -> Option<f64> {
        (self.max_dpi > 0.0).then_some(self.max_dpi)
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        let trimmed = self.output_dir.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub cursor_step_px: u32,
    pub scroll_step_px: u32,
    pub zoom_step: f64,
    pub marker_color: [u8; 3],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            cursor_step_px: 10,
            scroll_step_px: 120,
            zoom_step: 0.25,
            marker_color: [0, 0, 0],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub file: String,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: String::new(),
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn file(&self) -> Option<PathBuf> {
        let trimmed = self.file.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.export.default_scale.is_finite() || self.export.default_scale <= 0.0 {
            self.export.default_scale = defaults.export.default_scale;
        }
        self.export.jpeg_quality = self.export.jpeg_quality.clamp(1, 100);
        if !self.export.max_dpi.is_finite() || self.export.max_dpi < 0.0 {
            self.export.max_dpi = 0.0;
        }
        self.view.cursor_step_px = self.view.cursor_step_px.max(1);
        self.view.scroll_step_px = self.view.scroll_step_px.max(1);
        if !self.view.zoom_step.is_finite() || self.view.zoom_step <= 0.0 {
            self.view.zoom_step = defaults.view.zoom_step;
        }
        if self.log.level.trim().is_empty() {
            self.log.level = defaults.log.level;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("SPDF_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(
            PathBuf::from(xdg)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(
            PathBuf::from(appdata)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{Config, RasterEncoding};

    pub(crate) fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("spdf_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
        assert_eq!(config.export.default_scale, 4.0);
        assert_eq!(config.export.encoding, RasterEncoding::Flate);
        assert_eq!(config.export.max_dpi(), None);
        assert_eq!(config.export.output_dir(), None);
        assert_eq!(config.log.file(), None);
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [export]
            default_scale = -2.0
            encoding = "raw"
            jpeg_quality = 0
            max_dpi = 300.0
            output_dir = " /tmp/prints "

            [view]
            cursor_step_px = 0
            scroll_step_px = 0
            zoom_step = 0.0

            [log]
            level = ""
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert_eq!(config.export.default_scale, 4.0);
        assert_eq!(config.export.encoding, RasterEncoding::Raw);
        assert_eq!(config.export.jpeg_quality, 1);
        assert_eq!(config.export.max_dpi(), Some(300.0));
        assert_eq!(config.export.output_dir(), Some(PathBuf::from("/tmp/prints")));
        assert_eq!(config.export.file_suffix, "-scaled");
        assert_eq!(config.view.cursor_step_px, 1);
        assert_eq!(config.view.scroll_step_px, 1);
        assert_eq!(config.view.zoom_step, 0.25);
        assert_eq!(config.view.marker_color, [0, 0, 0]);
        assert_eq!(config.keymap.preset, "default");
        assert_eq!(config.log.level, "info");

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn load_from_path_rejects_directories_and_bad_toml() {
        let dir = unique_temp_path("config_dir");
        fs::create_dir_all(&dir).expect("temp dir should be created");
        assert!(Config::load_from_path(&dir).is_err());
        fs::remove_dir(&dir).expect("temp dir should be removed");

        let path = unique_temp_path("broken.toml");
        fs::write(&path, "[export\nencoding = 3").expect("config file should be written");
        let err = Config::load_from_path(&path).expect_err("broken toml should fail");
        assert!(err.to_string().contains("failed to parse config"));
        fs::remove_file(&path).expect("config file should be removed");
    }
}
