// Drives PositionServoNode through the scheduler with shared-state fakes

use std::io::Write;
use std::sync::{Arc, Mutex};
use teleop_core::{NodeState, RuntimeParams, Scheduler, TeleopError, TeleopResult};
use teleop_library::hardware::{Actuator, InputSource, ServoConfig, TelemetrySink};
use teleop_library::{ControlMode, PositionServoNode};

#[derive(Default)]
struct Pad {
    axes: [f64; 2],
    buttons: Vec<usize>,
    polls: usize,
}

#[derive(Clone, Default)]
struct FakeInput(Arc<Mutex<Pad>>);

impl FakeInput {
    fn hold(&self, buttons: &[usize], raw_y: f64) {
        let mut pad = self.0.lock().unwrap();
        pad.buttons = buttons.to_vec();
        pad.axes[1] = raw_y;
    }
}

impl InputSource for FakeInput {
    fn poll(&mut self) {
        self.0.lock().unwrap().polls += 1;
    }

    fn axis(&self, index: usize) -> f64 {
        self.0.lock().unwrap().axes.get(index).copied().unwrap_or(0.0)
    }

    fn button(&self, index: usize) -> bool {
        self.0.lock().unwrap().buttons.contains(&index)
    }
}

#[derive(Default)]
struct Motor {
    configured_with: Option<ServoConfig>,
    fail_configure: bool,
    position: i32,
    error: i32,
    output: f64,
    mode: ControlMode,
    targets: Vec<f64>,
    position_reads: usize,
}

#[derive(Clone, Default)]
struct FakeActuator(Arc<Mutex<Motor>>);

impl Actuator for FakeActuator {
    fn configure(&mut self, config: &ServoConfig) -> TeleopResult<()> {
        let mut motor = self.0.lock().unwrap();
        if motor.fail_configure {
            return Err(TeleopError::device_setup("fake", "no response"));
        }
        motor.configured_with = Some(config.clone());
        Ok(())
    }

    fn set_position_target(&mut self, target: f64) {
        let mut motor = self.0.lock().unwrap();
        motor.mode = ControlMode::Position;
        motor.targets.push(target);
    }

    fn current_position(&self) -> i32 {
        let mut motor = self.0.lock().unwrap();
        motor.position_reads += 1;
        motor.position
    }

    fn current_closed_loop_error(&self) -> i32 {
        self.0.lock().unwrap().error
    }

    fn current_output_percent(&self) -> f64 {
        self.0.lock().unwrap().output
    }

    fn control_mode(&self) -> ControlMode {
        self.0.lock().unwrap().mode
    }
}

#[derive(Clone, Default)]
struct FakeSink(Arc<Mutex<Vec<String>>>);

impl FakeSink {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl TelemetrySink for FakeSink {
    fn emit(&mut self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

struct Rig {
    scheduler: Scheduler,
    input: FakeInput,
    actuator: FakeActuator,
    sink: FakeSink,
}

fn rig() -> Rig {
    let input = FakeInput::default();
    let actuator = FakeActuator::default();
    let sink = FakeSink::default();
    let node = PositionServoNode::new(input.clone(), actuator.clone(), sink.clone());

    let mut scheduler = Scheduler::new();
    scheduler.add(Box::new(node), 0, Some(false));
    Rig {
        scheduler,
        input,
        actuator,
        sink,
    }
}

#[test]
fn test_preset_then_nudge_within_window() {
    let mut rig = rig();

    rig.input.hold(&[2], 0.0);
    rig.scheduler.tick_once();
    assert_eq!(rig.actuator.0.lock().unwrap().targets, vec![9600.0]);

    // mechanism has caught up; gamepad forward is negative
    rig.actuator.0.lock().unwrap().position = 9590;
    rig.input.hold(&[], -0.5);
    rig.scheduler.tick_once();
    assert_eq!(rig.actuator.0.lock().unwrap().targets, vec![9600.0, 9675.0]);
}

#[test]
fn test_held_button_fires_once() {
    let mut rig = rig();

    rig.input.hold(&[1], 0.0);
    for _ in 0..5 {
        rig.scheduler.tick_once();
    }
    assert_eq!(rig.actuator.0.lock().unwrap().targets, vec![4800.0]);

    rig.input.hold(&[], 0.0);
    rig.scheduler.tick_once();
    rig.input.hold(&[1], 0.0);
    rig.scheduler.tick_once();
    assert_eq!(rig.actuator.0.lock().unwrap().targets, vec![4800.0, 4800.0]);
}

#[test]
fn test_button4_does_nothing() {
    let mut rig = rig();

    rig.input.hold(&[4], 0.0);
    rig.scheduler.tick_once();
    rig.scheduler.tick_once();

    assert!(rig.actuator.0.lock().unwrap().targets.is_empty());
    assert_eq!(rig.actuator.0.lock().unwrap().mode, ControlMode::PercentOutput);
}

#[test]
fn test_input_polled_every_tick() {
    let mut rig = rig();
    for _ in 0..3 {
        rig.scheduler.tick_once();
    }
    assert_eq!(rig.input.0.lock().unwrap().polls, 3);
}

#[test]
fn test_telemetry_only_on_tenth_tick() {
    let mut rig = rig();
    {
        let mut motor = rig.actuator.0.lock().unwrap();
        motor.position = 120;
        motor.output = 0.25;
    }

    for _ in 0..9 {
        rig.scheduler.tick_once();
    }
    assert!(rig.sink.lines().is_empty());

    rig.scheduler.tick_once();
    assert_eq!(
        rig.sink.lines(),
        vec!["\tout right: 0.250000\tpos right: 120".to_string()]
    );
}

#[test]
fn test_telemetry_reports_closed_loop_in_position_mode() {
    let mut rig = rig();

    rig.input.hold(&[3], 0.0);
    rig.scheduler.tick_once();
    rig.input.hold(&[], 0.0);
    rig.actuator.0.lock().unwrap().error = -12;

    for _ in 0..9 {
        rig.scheduler.tick_once();
    }
    assert_eq!(
        rig.sink.lines(),
        vec!["\tout right: 0.000000\tpos right: 0\terrNative: -12\ttrg: 14400.000000".to_string()]
    );
}

#[test]
fn test_position_not_read_for_idle_arbitration() {
    let mut rig = rig();
    rig.scheduler.tick_once();
    // one read for telemetry, none for arbitration
    assert_eq!(rig.actuator.0.lock().unwrap().position_reads, 1);

    rig.input.hold(&[], -0.5);
    rig.scheduler.tick_once();
    assert_eq!(rig.actuator.0.lock().unwrap().position_reads, 3);
}

#[test]
fn test_configure_runs_at_init() {
    let mut rig = rig();
    assert!(rig.actuator.0.lock().unwrap().configured_with.is_none());

    rig.scheduler.tick_once();
    let configured = rig.actuator.0.lock().unwrap().configured_with.clone();
    assert_eq!(configured, Some(ServoConfig::default()));
    assert_eq!(
        rig.scheduler.node_state("PositionServoNode"),
        Some(&NodeState::Running)
    );
}

#[test]
fn test_failed_configure_never_ticks() {
    let mut rig = rig();
    rig.actuator.0.lock().unwrap().fail_configure = true;
    rig.input.hold(&[1], 0.0);

    rig.scheduler.tick_once();
    rig.scheduler.tick_once();

    assert!(matches!(
        rig.scheduler.node_state("PositionServoNode"),
        Some(NodeState::Error(_))
    ));
    assert!(rig.actuator.0.lock().unwrap().targets.is_empty());
    assert_eq!(rig.input.0.lock().unwrap().polls, 0);
}

#[test]
fn test_node_from_params_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "servo.kp: 5.0\narbiter.preset_rotations: [1.0, 2.0, 3.0]\ntelemetry.period_ticks: 1"
    )
    .unwrap();
    let params = RuntimeParams::from_file(file.path()).unwrap();

    let input = FakeInput::default();
    let actuator = FakeActuator::default();
    let sink = FakeSink::default();
    let node =
        PositionServoNode::from_params(input.clone(), actuator.clone(), sink.clone(), &params)
            .unwrap();

    let mut scheduler = Scheduler::new();
    scheduler.add(Box::new(node), 0, None);
    input.hold(&[3], 0.0);
    scheduler.tick_once();

    let motor = actuator.0.lock().unwrap();
    assert_eq!(motor.configured_with.as_ref().map(|c| c.kp), Some(5.0));
    assert_eq!(motor.targets, vec![2880.0]);
    assert_eq!(sink.lines().len(), 1);
}
