//! Runtime settings
//!
//! Read once at startup from a JSON file next to the binary. A missing or
//! malformed file falls back to defaults so the game always starts.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_WIDTH;

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Assets ===
    /// Sprite sheet image (PNG)
    pub sheet_path: PathBuf,
    /// Clip descriptor table (CSV rows of `name,start,end`)
    pub descriptor_path: PathBuf,
    /// Fixed frame width in sheet pixels
    pub frame_width: f32,

    // === Pacing ===
    /// Frame cap; 0 disables pacing entirely
    pub fps: u32,
    /// Fixed seed for reproducible runs; random when absent
    pub seed: Option<u64>,

    // === HUD ===
    /// Show the score/speed line
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_path: PathBuf::from("assets/sheet.png"),
            descriptor_path: PathBuf::from("assets/sheet.csv"),
            frame_width: FRAME_WIDTH,
            fps: 60,
            seed: None,
            show_hud: true,
        }
    }
}

impl Settings {
    /// Settings file name, looked up in the working directory
    const SETTINGS_PATH: &'static str = "plummet-settings.json";

    /// Load settings from disk, or defaults when the file is absent
    pub fn load() -> Self {
        match fs::read_to_string(Self::SETTINGS_PATH) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::SETTINGS_PATH);
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed {}: {err}", Self::SETTINGS_PATH);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Wall-clock budget for one frame
    pub fn frame_budget(&self) -> Duration {
        if self.fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(self.fps))
        }
    }
}
