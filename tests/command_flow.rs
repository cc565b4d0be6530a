//! End-to-end operator flows: record a route, save it, load it back and play it

use nalgebra::Vector3;
use rover_assist::core::log_buffer::LogLevel;
use rover_assist::{run_command, Autopilot, CommandError, CommandOutcome, MemoryStore, RouteError};
use rover_assist_core::navigation::{NavMode, Waypoint};
use rover_assist_core::parameters::ParameterStore;
use rover_assist_core::vehicle::{StandardController, VehicleController};

fn autopilot() -> Autopilot<StandardController> {
    Autopilot::new(StandardController::new(4.0), &ParameterStore::new()).unwrap()
}

#[test]
fn test_record_save_and_play_reversed() {
    let mut ap = autopilot();
    let mut store = MemoryStore::new();

    assert_eq!(
        run_command(&mut ap, &mut store, "record"),
        Ok(CommandOutcome::RecordingStarted)
    );
    for step in 0..4 {
        ap.controller_mut().position = Vector3::new(step as f32 * 5.0, 0.0, 0.0);
        ap.tick(0.1);
    }
    assert_eq!(
        run_command(&mut ap, &mut store, "RECORD"),
        Ok(CommandOutcome::RecordingStopped { waypoints: 4 })
    );
    assert_eq!(ap.controller().waypoints().len(), 4);

    assert_eq!(
        run_command(&mut ap, &mut store, "save yard"),
        Ok(CommandOutcome::Saved { waypoints: 4 })
    );
    assert_eq!(
        store.render(),
        "route.yard=WP1:0:0:0;WP2:5:0:0;WP3:10:0:0;WP4:15:0:0\n"
    );

    ap.load_waypoints(&[]);
    ap.controller_mut().position = Vector3::new(30.0, 0.0, 0.0);
    assert_eq!(
        run_command(&mut ap, &mut store, "play Yard reverse"),
        Ok(CommandOutcome::Playing { waypoints: 4 })
    );
    assert!(ap.is_enabled());
    let first = &ap.controller().waypoints()[0];
    assert_eq!(first.name.as_str(), "WP4");

    ap.tick(0.1);
    assert_eq!(ap.mode(), NavMode::Route);
    assert_eq!(
        ap.navigation().and_then(|r| r.waypoint.as_deref()),
        Some("WP4")
    );
}

#[test]
fn test_load_from_hand_edited_block() {
    let mut ap = autopilot();
    let mut store = MemoryStore::parse(
        "# garden loop\nroute.garden = gate:10:0:0; shed:10:10 ; pond:0:10:0\n",
    )
    .unwrap();

    assert_eq!(
        run_command(&mut ap, &mut store, "load garden"),
        Ok(CommandOutcome::Loaded { waypoints: 3 })
    );
    assert!(!ap.is_enabled());
    let names: Vec<_> = ap
        .controller()
        .waypoints()
        .iter()
        .map(|w| w.name.as_str())
        .collect();
    assert_eq!(names, ["gate", "shed", "pond"]);
}

#[test]
fn test_errors_reported_to_status_log() {
    let mut ap = autopilot();
    let mut store = MemoryStore::new();

    assert_eq!(
        run_command(&mut ap, &mut store, "play nowhere"),
        Err(CommandError::Route(RouteError::NotFound("nowhere".to_string())))
    );
    let line = ap.status_log().latest().unwrap();
    assert_eq!(line.level, LogLevel::Warn);
    assert_eq!(line.message.as_str(), "No route named nowhere");
    assert!(!ap.is_enabled());

    assert_eq!(
        run_command(&mut ap, &mut store, "save"),
        Err(CommandError::NoWaypoints)
    );
}

#[test]
fn test_save_rejects_unencodable_label() {
    let mut ap = autopilot();
    let mut store = MemoryStore::new();
    ap.load_waypoints(&[Waypoint::new("a:b", Vector3::zeros(), 0.0)]);

    assert!(matches!(
        run_command(&mut ap, &mut store, "save"),
        Err(CommandError::Route(RouteError::InvalidLabel(_)))
    ));
    assert!(store.is_empty());
}
