#[cfg(test)]
mod tests {
    use crate::commands::{AttackOrder, WorldCommand};
    use crate::components::Trail;
    use crate::enums::*;
    use crate::error::WarRoomError;
    use crate::state::SceneSnapshot;
    use crate::types::{Point3, Rgb, SimTime};

    #[test]
    fn test_command_uses_type_tag() {
        let json = r#"{"type":"LaunchAttacks","orders":[{"attacker":"France","target":"Germany"}]}"#;
        let cmd: WorldCommand = serde_json::from_str(json).unwrap();
        match cmd {
            WorldCommand::LaunchAttacks { orders } => {
                assert_eq!(orders, vec![AttackOrder::new("France", "Germany")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unit_command_parses() {
        let cmd: WorldCommand = serde_json::from_str(r#"{"type":"SpeedUp"}"#).unwrap();
        assert!(matches!(cmd, WorldCommand::SpeedUp));
    }

    #[test]
    fn test_error_serializes_through_report_failure() {
        let cmd = WorldCommand::ReportFailure {
            error: WarRoomError::service("timeout"),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: WorldCommand = serde_json::from_str(&json).unwrap();
        match back {
            WorldCommand::ReportFailure { error } => {
                assert_eq!(error, WarRoomError::service("timeout"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_resolution_failure_names_side_and_name() {
        let err = WarRoomError::unresolved(LookupSide::Attacker, "X");
        let text = err.to_string();
        assert!(text.contains("attacker"), "{text}");
        assert!(text.contains("\"X\""), "{text}");
    }

    #[test]
    fn test_direction_flip() {
        assert_eq!(Direction::Forward.flipped(), Direction::Backward);
        assert_eq!(Direction::Backward.flipped(), Direction::Forward);
    }

    #[test]
    fn test_rgb_lerp_endpoints() {
        let fire = Rgb(0xff6a00);
        let smoke = Rgb(0x555555);
        assert_eq!(fire.lerp(smoke, 0.0), fire);
        assert_eq!(fire.lerp(smoke, 1.0), smoke);
        assert_eq!(fire.lerp(smoke, 7.0), smoke);
    }

    #[test]
    fn test_sim_time_ignores_negative_delta() {
        let mut time = SimTime::default();
        time.advance(16.0);
        time.advance(-50.0);
        assert_eq!(time.frame, 2);
        assert_eq!(time.elapsed_ms, 16.0);
    }

    #[test]
    fn test_trail_is_bounded_newest_first() {
        let mut trail = Trail::with_capacity(3);
        for i in 0..5 {
            trail.push(Point3::new(i as f64, 0.0, 0.0));
        }
        assert_eq!(trail.positions.len(), 3);
        assert_eq!(trail.positions[0].x, 4.0);
        assert_eq!(trail.positions[2].x, 2.0);
    }

    #[test]
    fn test_empty_snapshot_serializes() {
        let snapshot = SceneSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"waypoints\":[]"));
        assert!(json.contains("\"phase\":\"Idle\""));
    }
}
