//! Mover tuning loaded from `assets/mover.toml`.
//!
//! Missing keys fall back to the simulation defaults. A missing or invalid file is logged and
//! the defaults are used as a whole.

use bevy::prelude::*;
use serde::Deserialize;
use sim::{FirstPersonTuning, MoverConfig};

const SETTINGS_PATH: &str = "assets/mover.toml";

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct MoverSettings {
    pub tuning: FirstPersonTuning,
    pub mover: MoverConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MoverFile {
    tuning: FirstPersonTuning,
    mover: MoverConfig,
}

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(load_settings(SETTINGS_PATH));
}

fn load_settings(path: &str) -> MoverSettings {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read {path}: {e}. Using default mover settings");
            return MoverSettings::default();
        }
    };

    match parse_settings(&text) {
        Ok(settings) => {
            info!("Loaded mover settings from {path}");
            settings
        }
        Err(e) => {
            warn!("Invalid mover settings in {path}: {e}. Using defaults");
            MoverSettings::default()
        }
    }
}

fn parse_settings(text: &str) -> Result<MoverSettings, String> {
    let file: MoverFile = toml::from_str(text).map_err(|e| e.to_string())?;
    file.tuning.validate().map_err(|e| e.to_string())?;
    file.mover.validate().map_err(|e| e.to_string())?;
    Ok(MoverSettings {
        tuning: file.tuning,
        mover: file.mover,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = parse_settings(
            r#"
            [tuning.forward]
            max_speed = 9.0
            acceleration = 50.0
            deceleration = 50.0

            [mover.resolver]
            max_iterations = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.tuning.forward.max_speed, 9.0);
        assert_eq!(settings.tuning.sideways, FirstPersonTuning::default().sideways);
        assert_eq!(settings.mover.resolver.max_iterations, 3);
        assert!(settings.mover.resolver.reset_speed_on_contact);
        assert_eq!(settings.mover.turn_speed, MoverConfig::default().turn_speed);
    }

    #[test]
    fn negative_acceleration_is_rejected() {
        let res = parse_settings(
            r#"
            [tuning.vertical]
            max_speed = 4.0
            acceleration = -1.0
            deceleration = 40.0
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        assert_eq!(
            load_settings("does/not/exist.toml"),
            MoverSettings::default()
        );
    }
}
