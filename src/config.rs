//! Process-wide configuration, read from the environment once at startup.

use crate::error::{DashboardError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on canvas dimensions. Well beyond any panel this daemon
/// targets, and keeps frame buffer sizes far away from integer limits.
pub const MAX_DIMENSION: u32 = 8192;

/// Where rendered frames are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Encode the frame as PNG and write it to `output_path`
    #[default]
    Png,
    /// Pack the frame to RGB565 and write it to the framebuffer device
    Framebuffer,
}

impl FromStr for DisplayMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            // "fb" is accepted as a shorthand for convenience
            "framebuffer" | "fb" => Ok(Self::Framebuffer),
            other => Err(DashboardError::config_error(format!(
                "DISPLAY_MODE must be 'png' or 'framebuffer', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Framebuffer => write!(f, "framebuffer"),
        }
    }
}

/// Immutable daemon configuration.
///
/// Constructed once from the environment at startup and passed by reference
/// into every component; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// PNG destination path (used in [`DisplayMode::Png`])
    pub output_path: PathBuf,
    /// Output sink selection
    pub display_mode: DisplayMode,
    /// Framebuffer device path (used in [`DisplayMode::Framebuffer`])
    pub fb_device: PathBuf,
    /// Sleep interval between refresh iterations
    pub refresh: Duration,
    /// Restrict the queue listing to this printer name (exact match)
    pub printer: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: crate::DEFAULT_WIDTH,
            height: crate::DEFAULT_HEIGHT,
            output_path: PathBuf::from(crate::DEFAULT_OUTPUT_PATH),
            display_mode: DisplayMode::Png,
            fb_device: PathBuf::from(crate::DEFAULT_FB_DEVICE),
            refresh: Duration::from_secs_f64(crate::DEFAULT_REFRESH_SECS),
            printer: None,
        }
    }
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// The environment-independent entry point; tests feed a map through the
    /// closure instead of mutating the global environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let width: u32 = parse_var(&lookup, "WIDTH", crate::DEFAULT_WIDTH)?;
        let height: u32 = parse_var(&lookup, "HEIGHT", crate::DEFAULT_HEIGHT)?;
        if width == 0 || height == 0 {
            return Err(DashboardError::config_error(
                "WIDTH and HEIGHT must be greater than zero",
            ));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(DashboardError::config_error(format!(
                "WIDTH and HEIGHT must be at most {}, got {}x{}",
                MAX_DIMENSION, width, height
            )));
        }

        let refresh_secs: f64 = parse_var(&lookup, "REFRESH_SEC", crate::DEFAULT_REFRESH_SECS)?;
        if !refresh_secs.is_finite() || refresh_secs <= 0.0 {
            return Err(DashboardError::config_error(format!(
                "REFRESH_SEC must be a positive number of seconds, got '{}'",
                refresh_secs
            )));
        }

        let display_mode = match non_empty(lookup("DISPLAY_MODE")) {
            Some(raw) => raw.parse()?,
            None => DisplayMode::Png,
        };

        let output_path = non_empty(lookup("OUTPUT_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(crate::DEFAULT_OUTPUT_PATH));

        let fb_device = non_empty(lookup("FBDEV"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(crate::DEFAULT_FB_DEVICE));

        let printer = non_empty(lookup("PRINTER"));

        Ok(Self {
            width,
            height,
            output_path,
            display_mode,
            fb_device,
            refresh: Duration::from_secs_f64(refresh_secs),
            printer,
        })
    }
}

/// Parse an optional environment variable, falling back to a default.
///
/// Unset and blank variables both take the default; a present but unparsable
/// value is a hard configuration error rather than a silent fallback.
fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(name)) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            DashboardError::config_error(format!("{} must be a number, got '{}'", name, raw))
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
