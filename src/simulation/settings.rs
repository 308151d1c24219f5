use std::fs;
use std::path::Path;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WORK_MULTIPLIER_SETTING: &str = "life.work.multiplier";
pub const HUSTLE_MULTIPLIER_SETTING: &str = "life.hustle.multiplier";
pub const KILL_COST_PERCENTAGE_SETTING: &str = "life.kill.cost.percentage";
pub const KILL_COST_BOUNTY_MULTIPLIER_SETTING: &str = "life.kill.cost.bountymultiplier";
pub const HOSPITAL_DURATION_MINUTES_SETTING: &str = "life.hospital.duration.minutes";

pub const SETTING_KEYS: [&str; 5] = [
    WORK_MULTIPLIER_SETTING,
    HUSTLE_MULTIPLIER_SETTING,
    KILL_COST_PERCENTAGE_SETTING,
    KILL_COST_BOUNTY_MULTIPLIER_SETTING,
    HOSPITAL_DURATION_MINUTES_SETTING,
];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("unknown setting {0}")]
    UnknownKey(String),
    #[error("setting {key} must be a finite, non-negative number (got {value})")]
    InvalidValue { key: String, value: f64 },
}

/// Tunable multipliers exposed by the host's configuration surface.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeSettings {
    #[serde(rename = "life.work.multiplier")]
    pub work_multiplier: f64,
    #[serde(rename = "life.hustle.multiplier")]
    pub hustle_multiplier: f64,
    #[serde(rename = "life.kill.cost.percentage")]
    pub kill_cost_percentage: f64,
    #[serde(rename = "life.kill.cost.bountymultiplier")]
    pub kill_bounty_multiplier: f64,
    #[serde(rename = "life.hospital.duration.minutes")]
    pub hospital_duration_minutes: u32,
}

impl Default for LifeSettings {
    fn default() -> Self {
        Self {
            work_multiplier: 1.0,
            hustle_multiplier: 1.0,
            kill_cost_percentage: 25.0,
            kill_bounty_multiplier: 2.0,
            hospital_duration_minutes: 8 * 60,
        }
    }
}

impl LifeSettings {
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            WORK_MULTIPLIER_SETTING => Some(self.work_multiplier),
            HUSTLE_MULTIPLIER_SETTING => Some(self.hustle_multiplier),
            KILL_COST_PERCENTAGE_SETTING => Some(self.kill_cost_percentage),
            KILL_COST_BOUNTY_MULTIPLIER_SETTING => Some(self.kill_bounty_multiplier),
            HOSPITAL_DURATION_MINUTES_SETTING => Some(self.hospital_duration_minutes as f64),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: f64) -> Result<(), SettingsError> {
        if !value.is_finite() || value < 0.0 {
            return Err(SettingsError::InvalidValue {
                key: key.to_string(),
                value,
            });
        }
        match key {
            WORK_MULTIPLIER_SETTING => self.work_multiplier = value,
            HUSTLE_MULTIPLIER_SETTING => self.hustle_multiplier = value,
            KILL_COST_PERCENTAGE_SETTING => self.kill_cost_percentage = value,
            KILL_COST_BOUNTY_MULTIPLIER_SETTING => self.kill_bounty_multiplier = value,
            HOSPITAL_DURATION_MINUTES_SETTING => {
                self.hospital_duration_minutes = value.round().min(u32::MAX as f64) as u32
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for key in SETTING_KEYS {
            let value = self.get(key).unwrap_or(0.0);
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidValue {
                    key: key.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Fraction of each party's score charged for a kill.
    pub fn kill_cost_fraction(&self) -> f64 {
        self.kill_cost_percentage / 100.0
    }
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<LifeSettings, SettingsError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let settings: LifeSettings =
        serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
            path: path.display().to_string(),
            source,
        })?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: LifeSettings =
            serde_json::from_str(r#"{"life.work.multiplier": 1.5}"#).unwrap();
        assert_eq!(settings.work_multiplier, 1.5);
        assert_eq!(settings.kill_cost_percentage, 25.0);
        assert_eq!(settings.hospital_duration_minutes, 480);
    }

    #[test]
    fn settings_are_addressable_by_name() {
        let mut settings = LifeSettings::default();
        settings.set(HOSPITAL_DURATION_MINUTES_SETTING, 90.0).unwrap();
        assert_eq!(settings.get(HOSPITAL_DURATION_MINUTES_SETTING), Some(90.0));
        assert!(matches!(
            settings.set("life.unknown", 1.0),
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(matches!(
            settings.set(WORK_MULTIPLIER_SETTING, -2.0),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn load_rejects_negative_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("life.json");
        fs::write(&path, r#"{"life.hustle.multiplier": -1}"#).unwrap();
        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::InvalidValue { .. })
        ));

        fs::write(&path, r#"{"life.kill.cost.percentage": 30}"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.kill_cost_fraction(), 0.3);
    }
}
