//! End-to-end tests driving recorded traces through the gesture pipeline

use blink_pilot::{
    cursor_control::DryRunActuator,
    cursor_smoother::ScreenSize,
    interfaces::ClickKind,
    orchestrator::{FrameOutcome, GestureOrchestrator},
    trace::{AnglesRecord, EyesRecord, Trace, TraceFrame, TraceProvider},
    tuning::TuningHandle,
};
use std::time::{Duration, Instant};

const FRAME_SECS: f64 = 1.0 / 30.0;

fn pipeline(tuning: TuningHandle) -> GestureOrchestrator<TraceProvider, DryRunActuator> {
    let actuator = DryRunActuator::new(Some(ScreenSize::new(1000, 500)));
    GestureOrchestrator::new(TraceProvider::new(), actuator, tuning)
}

fn frame(index: usize, yaw: f64, pitch: f64, openness: f64, eyewear: bool) -> TraceFrame {
    TraceFrame {
        t: index as f64 * FRAME_SECS,
        angles: Some(AnglesRecord { roll: 0.0, pitch, yaw }),
        eyes: Some(EyesRecord::with_openness(openness)),
        eyewear,
        ..TraceFrame::default()
    }
}

/// Neutral head, eyes closed on the listed frame indices
fn blink_trace(frames: usize, closed: &[usize]) -> Trace {
    Trace {
        frames: (0..frames)
            .map(|i| frame(i, 0.0, 0.0, if closed.contains(&i) { 0.05 } else { 0.6 }, false))
            .collect(),
    }
}

fn run(
    pipeline: &mut GestureOrchestrator<TraceProvider, DryRunActuator>,
    trace: &Trace,
) -> Vec<FrameOutcome> {
    let start = Instant::now();
    trace
        .frames
        .iter()
        .map(|f| pipeline.process_frame(f, start + f.offset()).unwrap())
        .collect()
}

fn clicks(outcomes: &[FrameOutcome]) -> Vec<ClickKind> {
    outcomes.iter().filter_map(|o| o.click).collect()
}

#[test]
fn test_neutral_head_keeps_cursor_centered() {
    let mut p = pipeline(TuningHandle::default());
    let outcomes = run(&mut p, &blink_trace(20, &[]));

    for outcome in &outcomes {
        let pos = outcome.cursor.unwrap();
        assert_eq!((pos.x, pos.y), (500.0, 250.0));
        assert!(!outcome.blinked);
    }
    assert_eq!(p.actuator().move_count(), 20);
    assert!(p.actuator().clicks().is_empty());
}

#[test]
fn test_blink_counts_map_to_clicks() {
    let cases: [(&[usize], Option<ClickKind>); 4] = [
        (&[2], None),
        (&[2, 4], Some(ClickKind::Primary)),
        (&[2, 3, 4], Some(ClickKind::Secondary)),
        (&[1, 2, 3, 4], Some(ClickKind::Double)),
    ];

    for (closed, expected) in cases {
        let mut p = pipeline(TuningHandle::default());
        let outcomes = run(&mut p, &blink_trace(30, closed));

        assert_eq!(clicks(&outcomes), expected.into_iter().collect::<Vec<_>>(), "closed frames {closed:?}");
        assert_eq!(p.actuator().clicks(), expected.as_slice());
        assert_eq!(p.debouncer().pending_count(), 0);
    }
}

#[test]
fn test_click_waits_for_interval_after_first_blink() {
    let trace = blink_trace(30, &[3, 5]);
    let mut p = pipeline(TuningHandle::default());
    let outcomes = run(&mut p, &trace);

    let click_frame = outcomes.iter().position(|o| o.click.is_some()).unwrap();
    let first_blink = trace.frames[3].offset();
    let interval = Duration::from_millis(200);
    assert!(trace.frames[click_frame].offset() - first_blink > interval);
    assert!(trace.frames[click_frame - 1].offset() - first_blink <= interval);
}

#[test]
fn test_motion_settles_after_click() {
    let mut p = pipeline(TuningHandle::default());
    let outcomes = run(&mut p, &blink_trace(40, &[2, 4]));

    let click_frame = outcomes.iter().position(|o| o.click.is_some()).unwrap();
    // The click frame itself still moved the cursor
    assert!(outcomes[click_frame].cursor.is_some());
    assert!(outcomes[click_frame + 1].cursor.is_none());
    assert!(outcomes[click_frame + 2].cursor.is_none());
    assert!(outcomes[click_frame + 4].cursor.is_some());

    let moved = outcomes.iter().filter(|o| o.cursor.is_some()).count();
    assert_eq!(p.actuator().move_count(), moved);
    assert!(moved < outcomes.len());
}

#[test]
fn test_eyewear_raises_threshold() {
    let trace = |eyewear: bool| Trace {
        frames: (0..10).map(|i| frame(i, 0.0, 0.0, 0.4, eyewear)).collect(),
    };

    let outcomes = run(&mut pipeline(TuningHandle::default()), &trace(false));
    assert!(outcomes.iter().all(|o| !o.blinked));

    let outcomes = run(&mut pipeline(TuningHandle::default()), &trace(true));
    assert!(outcomes.iter().all(|o| o.blinked));
}

#[test]
fn test_sustained_turn_converges_monotonically() {
    let trace = Trace {
        frames: (0..120).map(|i| frame(i, 20.0, 17.5, 0.6, false)).collect(),
    };
    let outcomes = run(&mut pipeline(TuningHandle::default()), &trace);

    let mut last = (500.0, 250.0);
    for outcome in &outcomes {
        assert!((outcome.direction.x - 0.5).abs() < 1e-9);
        assert!((outcome.direction.y - 0.5).abs() < 1e-9);

        let pos = outcome.cursor.unwrap();
        assert!(pos.x >= last.0 && pos.x <= 750.0 + 1e-9);
        assert!(pos.y <= last.1 && pos.y >= 125.0 - 1e-9);
        last = (pos.x, pos.y);
    }
    assert!((last.0 - 750.0).abs() < 1e-3);
    assert!((last.1 - 125.0).abs() < 1e-3);
}

#[test]
fn test_small_motion_inside_deadzone() {
    let trace = Trace {
        frames: (0..10).map(|i| frame(i, 1.0, -1.5, 0.6, false)).collect(),
    };
    let outcomes = run(&mut pipeline(TuningHandle::default()), &trace);

    for outcome in outcomes {
        assert_eq!((outcome.direction.x, outcome.direction.y), (0.0, 0.0));
    }
}

#[test]
fn test_extreme_angles_saturate() {
    let trace = Trace {
        frames: vec![frame(0, 60.0, -95.0, 0.6, false)],
    };
    let outcomes = run(&mut pipeline(TuningHandle::default()), &trace);

    assert_eq!(outcomes[0].direction.x, 1.0);
    assert_eq!(outcomes[0].direction.y, -1.0);
}

#[test]
fn test_missing_pose_drifts_back_to_center() {
    let mut frames: Vec<TraceFrame> = (0..30).map(|i| frame(i, -40.0, 0.0, 0.6, false)).collect();
    frames.extend((30..90).map(|i| TraceFrame {
        t: i as f64 * FRAME_SECS,
        ..TraceFrame::default()
    }));
    let outcomes = run(&mut pipeline(TuningHandle::default()), &Trace { frames });

    let turned = outcomes[29].cursor.unwrap();
    assert!(turned.x < 100.0);
    for outcome in &outcomes[30..] {
        assert_eq!(outcome.angles.yaw, 0.0);
        assert_eq!((outcome.direction.x, outcome.direction.y), (0.0, 0.0));
    }
    assert!((outcomes[89].cursor.unwrap().x - 500.0).abs() < 1.0);
}

#[test]
fn test_tuning_changes_apply_on_next_frame() {
    let tuning = TuningHandle::default();
    let mut p = pipeline(tuning.clone());
    let start = Instant::now();
    let f = frame(0, 8.0, 0.0, 0.6, false);

    let before = p.process_frame(&f, start).unwrap();
    assert!((before.direction.x - 0.2).abs() < 1e-9);

    let setter = tuning.clone();
    std::thread::spawn(move || setter.set_sensitivity(2.0)).join().unwrap();

    let after = p.process_frame(&f, start + Duration::from_millis(33)).unwrap();
    assert!((after.direction.x - 0.4).abs() < 1e-9);
}

#[test]
fn test_longer_click_interval_merges_blinks() {
    let tuning = TuningHandle::default();
    tuning.set_click_interval(Duration::from_millis(600));
    let mut p = pipeline(tuning);

    // Blinks 300 ms apart fall into one 600 ms window
    let outcomes = run(&mut p, &blink_trace(60, &[2, 11]));
    assert_eq!(clicks(&outcomes), vec![ClickKind::Primary]);
}

#[test]
fn test_reset_clears_pending_blinks() {
    let mut p = pipeline(TuningHandle::default());
    let start = Instant::now();

    p.process_frame(&frame(0, 0.0, 0.0, 0.05, false), start).unwrap();
    assert_eq!(p.debouncer().pending_count(), 1);

    p.reset();
    assert_eq!(p.debouncer().pending_count(), 0);
    let outcome = p.process_frame(&frame(30, 0.0, 0.0, 0.6, false), start + Duration::from_secs(1)).unwrap();
    assert_eq!(outcome.click, None);
}

#[test]
fn test_yaml_trace_replay() {
    let yaml = r"
frames:
  - t: 0.00
    angles: { yaw: 40.0 }
  - t: 0.03
    angles: { yaw: 40.0 }
    eyes:
      left:  { top: [0.40, 0.499], bottom: [0.40, 0.501], outer: [0.45, 0.5], inner: [0.35, 0.5] }
      right: { top: [0.60, 0.499], bottom: [0.60, 0.501], outer: [0.55, 0.5], inner: [0.65, 0.5] }
  - t: 0.06
    angles: { yaw: 40.0 }
  - t: 0.09
    angles: { yaw: 40.0 }
    eyes:
      left:  { top: [0.40, 0.499], bottom: [0.40, 0.501], outer: [0.45, 0.5], inner: [0.35, 0.5] }
      right: { top: [0.60, 0.499], bottom: [0.60, 0.501], outer: [0.55, 0.5], inner: [0.65, 0.5] }
  - t: 0.50
    head:
      - [1.0, 0.0, 0.0, 0.0]
      - [0.0, 1.0, 0.0, 0.0]
      - [0.0, 0.0, 1.0, 0.0]
      - [0.0, 0.0, 0.0, 1.0]
";
    let trace = Trace::from_yaml(yaml).unwrap();
    let mut p = pipeline(TuningHandle::default());
    let outcomes = run(&mut p, &trace);

    assert_eq!(clicks(&outcomes), vec![ClickKind::Primary]);
    assert_eq!(outcomes[0].direction.x, 1.0);
    assert_eq!(outcomes[4].direction.x, 0.0);

    let (provider, actuator) = p.into_parts();
    assert_eq!(provider.processed(), 5);
    assert_eq!(actuator.clicks(), &[ClickKind::Primary]);
}
