//! Runtime tunables.
//!
//! Defaults reproduce the classic 168x84 dot panel at 3 pixels per dot and
//! 30 renders per second. A few values can be overridden from the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::{renderer::Palette, viewpoint::Speeds};

pub const ENV_PIXELS_PER_DOT: &str = "MAZE_PIXELS_PER_DOT";
pub const ENV_FPS: &str = "MAZE_FPS";
pub const ENV_MOVE_SPEED: &str = "MAZE_MOVE_SPEED";
pub const ENV_TURN_SPEED: &str = "MAZE_TURN_SPEED";

pub const MAX_PIXELS_PER_DOT: u32 = 32;
pub const MAX_RENDERS_PER_SECOND: u32 = 240;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: &'static str,
    pub dots_width: usize,
    pub dots_height: usize,
    pub pixels_per_dot: u32,
    pub renders_per_second: u32,
    pub speeds: Speeds,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Flip Dots Maze",
            dots_width: 56 * 3,
            dots_height: 28 * 3,
            pixels_per_dot: 3,
            renders_per_second: 30,
            speeds: Speeds::default(),
            palette: Palette::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; bad values are logged and skipped.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = positive(&lookup, ENV_PIXELS_PER_DOT, MAX_PIXELS_PER_DOT) {
            config.pixels_per_dot = v;
        }
        if let Some(v) = positive(&lookup, ENV_FPS, MAX_RENDERS_PER_SECOND) {
            config.renders_per_second = v;
        }
        if let Some(v) = positive(&lookup, ENV_MOVE_SPEED, f32::MAX) {
            config.speeds.move_per_ms = v;
        }
        if let Some(v) = positive(&lookup, ENV_TURN_SPEED, f32::MAX) {
            config.speeds.turn_per_ms = v;
        }
        config
    }

    /// Minimum real time between two ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.renders_per_second.max(1) as u64)
    }

    pub fn window_size(&self) -> (u32, u32) {
        (
            (self.dots_width as u32).saturating_mul(self.pixels_per_dot),
            (self.dots_height as u32).saturating_mul(self.pixels_per_dot),
        )
    }
}

/// Parse `key` as a value in `(0, max]`.
fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, max: T) -> Option<T>
where
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() && v <= max => Some(v),
        _ => {
            log::warn!("Ignoring {key}={raw:?}: expected a positive number up to {max}");
            None
        }
    }
}
