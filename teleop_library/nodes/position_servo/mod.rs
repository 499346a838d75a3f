use crate::algorithms::{ArbiterConfig, ArbiterState, PositionArbiter, TickThrottle};
use crate::hardware::{Actuator, InputMapping, InputSource, ServoConfig, TelemetrySink};
use crate::messages::{ClosedLoopStatus, PositionCommand, TelemetryFrame, TickInput};
use teleop_core::error::TeleopResult;
use teleop_core::{Node, NodeInfo, NodeInfoExt, NodePriority, RuntimeParams, TeleopError};

/// Default telemetry period, in ticks
pub const DEFAULT_TELEMETRY_PERIOD: u32 = 10;

/// Position Servo Node - gamepad teleop of a closed-loop position actuator
///
/// Each tick: poll the gamepad, let the [`PositionArbiter`] pick a setpoint,
/// forward it to the actuator, and every `telemetry_period` ticks publish a
/// [`TelemetryFrame`] line to the sink.
///
/// The actuator is configured with its [`ServoConfig`] in `init`; a failure
/// there keeps the node from ever ticking.
pub struct PositionServoNode<I, A, T> {
    input: I,
    actuator: A,
    sink: T,

    mapping: InputMapping,
    servo_config: ServoConfig,
    arbiter: PositionArbiter,
    throttle: TickThrottle,

    last_input: TickInput,
    last_command: Option<PositionCommand>,
    last_frame: Option<TelemetryFrame>,
}

impl<I, A, T> PositionServoNode<I, A, T>
where
    I: InputSource,
    A: Actuator,
    T: TelemetrySink,
{
    /// Create a node with the default mapping, gains and presets
    pub fn new(input: I, actuator: A, sink: T) -> Self {
        Self {
            input,
            actuator,
            sink,
            mapping: InputMapping::default(),
            servo_config: ServoConfig::default(),
            arbiter: PositionArbiter::new(ArbiterConfig::default()),
            throttle: TickThrottle::new(DEFAULT_TELEMETRY_PERIOD),
            last_input: TickInput::default(),
            last_command: None,
            last_frame: None,
        }
    }

    /// Create a node configured from `input.*`, `servo.*`, `arbiter.*` and
    /// `telemetry.period_ticks`
    pub fn from_params(input: I, actuator: A, sink: T, params: &RuntimeParams) -> TeleopResult<Self> {
        let period: u32 = params.require_or("telemetry.period_ticks", DEFAULT_TELEMETRY_PERIOD)?;
        if period == 0 {
            return Err(TeleopError::config("telemetry.period_ticks must be at least 1"));
        }

        let mut node = Self::new(input, actuator, sink);
        node.set_mapping(InputMapping::from_params(params)?);
        node.set_servo_config(ServoConfig::from_params(params)?);
        node.set_arbiter_config(ArbiterConfig::from_params(params)?);
        node.set_telemetry_period(period);
        Ok(node)
    }

    pub fn set_mapping(&mut self, mapping: InputMapping) {
        self.mapping = mapping;
    }

    /// Applied on the next `init`
    pub fn set_servo_config(&mut self, config: ServoConfig) {
        self.servo_config = config;
    }

    /// Replaces the arbiter; its target and button history start over
    pub fn set_arbiter_config(&mut self, config: ArbiterConfig) {
        self.arbiter = PositionArbiter::new(config);
    }

    pub fn set_telemetry_period(&mut self, period: u32) {
        self.throttle = TickThrottle::new(period);
    }

    pub fn arbiter_state(&self) -> &ArbiterState {
        self.arbiter.state()
    }

    pub fn target_position(&self) -> f64 {
        self.arbiter.target_position()
    }

    pub fn last_input(&self) -> &TickInput {
        &self.last_input
    }

    /// Command sent on the most recent tick, if any
    pub fn last_command(&self) -> Option<&PositionCommand> {
        self.last_command.as_ref()
    }

    pub fn last_frame(&self) -> Option<&TelemetryFrame> {
        self.last_frame.as_ref()
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// One control step; the body of `tick`
    pub fn step(&mut self, mut ctx: Option<&mut NodeInfo>) {
        self.input.poll();
        self.actuator.refresh();

        let input = self.mapping.sample(&self.input);
        let output_percent = self.actuator.current_output_percent();
        let position = self.actuator.current_position();

        if input != self.last_input {
            ctx.log_pub("input", &input);
        }

        let actuator = &self.actuator;
        let command = self.arbiter.tick(&input, || actuator.current_position());

        if let Some(cmd) = command {
            self.actuator.set_position_target(cmd.target);
            ctx.log_pub("position_target", &cmd);
        }

        let closed_loop = self.actuator.is_in_position_mode().then(|| ClosedLoopStatus {
            error: self.actuator.current_closed_loop_error(),
            target: self.arbiter.target_position(),
        });
        let frame = TelemetryFrame {
            output_percent,
            position,
            closed_loop,
        };

        if self.throttle.ready() {
            self.sink.emit(&frame.to_line());
            ctx.log_debug(&format!("telemetry: {}", frame.to_line().trim_start()));
        }

        self.last_input = input;
        self.last_command = command;
        self.last_frame = Some(frame);
    }
}

impl<I, A, T> Node for PositionServoNode<I, A, T>
where
    I: InputSource + Send,
    A: Actuator + Send,
    T: TelemetrySink + Send,
{
    fn name(&self) -> &'static str {
        "PositionServoNode"
    }

    fn init(&mut self, ctx: &mut NodeInfo) -> TeleopResult<()> {
        self.actuator.configure(&self.servo_config).map_err(|e| {
            TeleopError::InitializationFailed(format!("actuator configuration rejected: {}", e))
        })?;

        let presets = self.arbiter.config().preset_targets();
        ctx.log_info(&format!(
            "Servo configured (device {}, kP={} kI={} kD={}), presets {:?} counts",
            self.servo_config.device_id,
            self.servo_config.kp,
            self.servo_config.ki,
            self.servo_config.kd,
            presets
        ));
        Ok(())
    }

    fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
        self.step(ctx);
    }

    fn shutdown(&mut self, ctx: &mut NodeInfo) -> TeleopResult<()> {
        ctx.log_info(&format!(
            "Stopping after {:.1}s with target {:.1} counts, position {} counts",
            ctx.uptime().as_secs_f64(),
            self.arbiter.target_position(),
            self.actuator.current_position()
        ));
        Ok(())
    }

    fn priority(&self) -> NodePriority {
        NodePriority::Critical
    }
}
