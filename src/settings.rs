//! Settings and progress persistence using TOML
//!
//! Stores settings in ~/.config/blastr/settings.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::levels::LEVELS;
use crate::pointer::MovementMode;

/// Game settings and saved progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Audio settings
    pub audio: AudioSettings,
    /// Saved progress
    pub progress: Progress,
}

/// Gameplay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Drag smoothing: "precise", "smooth", "accelerated"
    pub movement_mode: String,
    /// Clear flash and score pop-up effects
    pub effects: bool,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// BGM volume (0-100)
    pub bgm_volume: u32,
    /// SFX volume (0-100)
    pub sfx_volume: u32,
}

/// Saved progress across sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    /// Best Classic score
    pub best_score: u64,
    /// Best Blast score
    pub best_blast: u64,
    /// Stars earned per Adventure level, 0 for unplayed
    pub adventure_stars: Vec<u8>,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            movement_mode: MovementMode::default().name().to_string(),
            effects: true,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            bgm_volume: 25,
            sfx_volume: 50,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blastr", "blastr").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or create default
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    pub fn movement_mode(&self) -> MovementMode {
        MovementMode::from_name(&self.gameplay.movement_mode)
    }

    pub fn set_movement_mode(&mut self, mode: MovementMode) {
        self.gameplay.movement_mode = mode.name().to_string();
    }

    /// Record a finished Classic score, keeping the best
    pub fn record_classic_score(&mut self, score: u64) {
        self.progress.best_score = self.progress.best_score.max(score);
    }

    /// Record a finished Blast score, keeping the best
    pub fn record_blast_score(&mut self, score: u64) {
        self.progress.best_blast = self.progress.best_blast.max(score);
    }

    /// Stars earned for a level, 0 for unplayed
    pub fn stars_for(&self, level_index: usize) -> u8 {
        self.progress
            .adventure_stars
            .get(level_index)
            .copied()
            .unwrap_or(0)
    }

    /// Record a level result, keeping the best star count
    pub fn record_stars(&mut self, level_index: usize, stars: u8) {
        if self.progress.adventure_stars.len() <= level_index {
            self.progress.adventure_stars.resize(level_index + 1, 0);
        }
        let slot = &mut self.progress.adventure_stars[level_index];
        *slot = (*slot).max(stars.min(3));
    }

    /// A level is playable once the one before it has at least one star
    pub fn is_unlocked(&self, level_index: usize) -> bool {
        level_index == 0 || (level_index < LEVELS.len() && self.stars_for(level_index - 1) >= 1)
    }

    pub fn total_stars(&self) -> u32 {
        self.progress.adventure_stars.iter().map(|&s| s as u32).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.movement_mode(), MovementMode::Smooth);
        assert!(settings.gameplay.effects);
        assert_eq!(settings.progress.best_score, 0);
        assert!(settings.is_unlocked(0));
        assert!(!settings.is_unlocked(1));
    }

    #[test]
    fn test_record_keeps_best() {
        let mut settings = Settings::default();
        settings.record_classic_score(120);
        settings.record_classic_score(80);
        assert_eq!(settings.progress.best_score, 120);

        settings.record_stars(0, 2);
        settings.record_stars(0, 1);
        assert_eq!(settings.stars_for(0), 2);
        // Star counts clamp at 3
        settings.record_stars(4, 9);
        assert_eq!(settings.stars_for(4), 3);
    }

    #[test]
    fn test_unlock_chain() {
        let mut settings = Settings::default();
        assert!(!settings.is_unlocked(1));
        settings.record_stars(0, 1);
        assert!(settings.is_unlocked(1));
        assert!(!settings.is_unlocked(2));
        // Out-of-range indices never unlock
        assert!(!settings.is_unlocked(LEVELS.len()));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings.set_movement_mode(MovementMode::Accelerated);
        settings.record_classic_score(512);
        settings.record_stars(2, 3);

        let text = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.movement_mode(), MovementMode::Accelerated);
        assert_eq!(back.progress.best_score, 512);
        assert_eq!(back.stars_for(2), 3);
    }

    #[test]
    fn test_corrupt_toml_falls_back_to_default() {
        let parsed: Settings = toml::from_str("").unwrap();
        assert_eq!(parsed.audio.sfx_volume, 50);
        // Unknown movement mode names degrade to the default
        let settings: Settings =
            toml::from_str("[gameplay]\nmovement_mode = \"warp\"").unwrap();
        assert_eq!(settings.movement_mode(), MovementMode::Smooth);
    }
}
