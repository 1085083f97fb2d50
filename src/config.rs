// Configuration module for reading Forager.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub debug: DebugConfig,
}

/// Decision engine constants and feature toggles
///
/// The two heuristic stages (food seeking and the open-space fallback) are
/// independently switchable so a single engine covers both play styles.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Health threshold below which the snake actively hunts food
    pub low_health_threshold: i32,
    pub enable_food_seeking: bool,
    pub enable_space_fallback: bool,
    /// Opponents farther than this (Manhattan) count as "far"
    pub far_opponent_distance: i32,
    /// Score reduction awarded per far opponent
    pub far_opponent_reward: i32,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Forager.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Forager.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Forager.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Forager.toml
    pub fn default_hardcoded() -> Self {
        Config {
            engine: EngineConfig {
                low_health_threshold: 95,
                enable_food_seeking: true,
                enable_space_fallback: true,
                far_opponent_distance: 2,
                far_opponent_reward: 2,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "forager_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Could not load Forager.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }
}
