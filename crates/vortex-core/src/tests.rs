#[cfg(test)]
mod tests {
    use crate::commands::HostCommand;
    use crate::enums::*;
    use crate::events::GameEvent;
    use crate::input::InputState;
    use crate::settings::{Settings, SettingsError};
    use crate::types::{normalize_angle, rotate, SimTime, Vec2};

    #[test]
    fn test_default_settings_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
        assert_eq!(Settings::sandbox().validate(), Ok(()));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let mut settings = Settings::default();
        settings.rocket.radius = -4.0;
        let err = settings.validate().unwrap_err();
        assert_eq!(
            err,
            SettingsError::NotPositive {
                name: "rocket.radius",
                value: -4.0
            }
        );
        assert!(err.to_string().contains("rocket.radius"));
    }

    #[test]
    fn test_well_mass_ordering_rejected() {
        let mut settings = Settings::default();
        settings.gravity_well.critical_mass = settings.gravity_well.initial_mass;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::WellMass { .. })
        ));
    }

    #[test]
    fn test_resistance_must_be_a_factor() {
        let mut settings = Settings::default();
        settings.physics.ship_resistance = 1.2;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NotAFactor { .. })
        ));
    }

    #[test]
    fn test_settings_partial_json_uses_defaults() {
        let json = r#"{ "field": { "width": 640.0 }, "mission": { "quota": 3 } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.field.width, 640.0);
        assert_eq!(settings.field.height, crate::constants::FIELD_HEIGHT);
        assert_eq!(settings.mission.quota, 3);
        assert!(settings.mission.enabled);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_entity_kind_indices_are_dense() {
        for (i, kind) in EntityKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert!(!EntityKind::Effect.is_physical());
        assert!(!EntityKind::GravityWell.is_physical());
        assert!(EntityKind::Particle.is_physical());
    }

    #[test]
    fn test_ability_phase_cycle() {
        let mut phase = AbilityPhase::Off;
        let mut seen = Vec::new();
        for _ in 0..4 {
            phase = phase.successor();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                AbilityPhase::Activating,
                AbilityPhase::On,
                AbilityPhase::Passivating,
                AbilityPhase::Off
            ]
        );
    }

    #[test]
    fn test_turret_layouts() {
        assert_eq!(TurretLayout::Single.turrets(), 1);
        assert_eq!(TurretLayout::Twin.turrets(), 2);
        assert_eq!(TurretLayout::Spread3.turrets(), 3);
        assert_eq!(TurretLayout::Quad.turrets(), 4);
    }

    #[test]
    fn test_input_turn_sign() {
        let mut input = InputState {
            left: true,
            left_pressed_at: 7,
            ..Default::default()
        };
        assert_eq!(input.turn_sign(), -1.0);
        assert_eq!(input.turn_pressed_at(), Some(7));
        input.right = true;
        assert_eq!(input.turn_sign(), 0.0);
        assert_eq!(input.turn_pressed_at(), None);
    }

    #[test]
    fn test_host_command_serde() {
        let cmd = HostCommand::Input {
            player: 1,
            state: InputState {
                thrust: true,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"Input\""));
        let back: HostCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_event_names() {
        let ev = GameEvent::PlanetoidDestroyed { tick: 3 };
        assert_eq!(ev.name(), "planetoid destroyed");
        let ev = GameEvent::NextMissionRequested { tick: 3 };
        assert_eq!(ev.name(), "command: next mission");
        let json = serde_json::to_string(&GameEvent::PlayerOutOfLives { player: 0, tick: 9 }).unwrap();
        assert!(json.contains("PlayerOutOfLives"));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..60 {
            t.advance();
        }
        assert_eq!(t.tick, 60);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
        assert_eq!(t.since(45), 15);
        assert_eq!(t.since(100), 0);
    }

    #[test]
    fn test_rotate_and_normalize() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
        assert!((v - Vec2::new(0.0, 1.0)).length() < 1e-12);
        let a = normalize_angle(-0.5);
        assert!((a - (std::f64::consts::TAU - 0.5)).abs() < 1e-12);
    }
}
