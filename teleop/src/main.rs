/// Teleop runner
///
/// Runs the position servo node against a simulated actuator, fed by a
/// scripted input or (with the `gilrs` feature) a real gamepad.
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use teleop_core::{RuntimeParams, Scheduler, SchedulerConfig};
use teleop_library::hardware::{
    InputSource, LogTelemetry, ScriptedInput, SimulatedActuator, StdoutTelemetry, TelemetrySink,
};
use teleop_library::PositionServoNode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Travel of the simulated mechanism per tick at full output
const DEFAULT_SIM_SPEED: f64 = 120.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum InputBackend {
    /// Built-in or file-based input script
    Script,
    /// First connected gamepad (requires 'gilrs' feature)
    Gamepad,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TelemetryTarget {
    /// Plain lines on stdout
    Stdout,
    /// Through the logger at info level
    Log,
}

#[derive(Parser, Debug)]
#[command(name = "teleop")]
#[command(about = "Gamepad teleop of a closed-loop position servo", long_about = None)]
struct Args {
    /// YAML parameter file (scheduler.*, input.*, servo.*, arbiter.*, telemetry.*)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Tick rate in Hz, overrides scheduler.rate_hz
    #[arg(short, long)]
    rate: Option<f64>,

    /// Stop after this many ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Stop after this many seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Where operator input comes from
    #[arg(short, long, value_enum, default_value_t = InputBackend::Script)]
    input: InputBackend,

    /// Input script for the script backend; a built-in demo otherwise
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Where telemetry lines go
    #[arg(long, value_enum, default_value_t = TelemetryTarget::Stdout)]
    telemetry: TelemetryTarget,

    /// Simulated actuator travel per tick at full output, in counts
    #[arg(long, default_value_t = DEFAULT_SIM_SPEED)]
    sim_speed: f64,

    /// Print per-node lifecycle and publish logs to the console
    #[arg(long)]
    node_logs: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        "teleop=debug,teleop_core=debug,teleop_library=debug,telemetry=info"
    } else {
        "teleop=info,teleop_core=info,teleop_library=info,telemetry=info"
    };

    // RUST_LOG wins over the built-in filter
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let params = match &args.params {
        Some(path) => RuntimeParams::from_file(path)
            .with_context(|| format!("loading params from {}", path.display()))?,
        None => RuntimeParams::new(),
    };

    let config = scheduler_config(&args, &params)?;
    let input = open_input(&args)?;
    let actuator = sim_actuator(&args)?;
    let sink: Box<dyn TelemetrySink + Send> = match args.telemetry {
        TelemetryTarget::Stdout => Box::new(StdoutTelemetry),
        TelemetryTarget::Log => Box::new(LogTelemetry::default()),
    };

    let node = PositionServoNode::from_params(input, actuator, sink, &params)
        .context("building position servo node")?;

    info!(
        "teleop {} at {:.1} Hz (input: {:?}, telemetry: {:?})",
        teleop::version(),
        config.rate_hz,
        args.input,
        args.telemetry
    );

    let mut scheduler = Scheduler::new().with_name("teleop").with_config(config);
    scheduler.add(Box::new(node), 0, Some(args.node_logs));
    scheduler.run().context("scheduler failed")?;

    Ok(())
}

/// Parameter file first, command-line flags on top
fn scheduler_config(args: &Args, params: &RuntimeParams) -> Result<SchedulerConfig> {
    let mut config = SchedulerConfig::from_params(params).context("reading scheduler params")?;

    if let Some(rate) = args.rate {
        config.rate_hz = rate;
    }
    if let Some(ticks) = args.ticks {
        config.max_ticks = Some(ticks);
    }
    if let Some(seconds) = args.duration {
        let duration = Duration::try_from_secs_f64(seconds).map_err(|e| {
            anyhow!("--duration must be a non-negative number of seconds, got {} ({})", seconds, e)
        })?;
        config.max_duration = Some(duration);
    }

    config.validate().context("invalid scheduler settings")?;
    Ok(config)
}

fn sim_actuator(args: &Args) -> Result<SimulatedActuator> {
    if !args.sim_speed.is_finite() || args.sim_speed < 0.0 {
        bail!("--sim-speed must be a non-negative number of counts, got {}", args.sim_speed);
    }
    Ok(SimulatedActuator::new("right", args.sim_speed))
}

fn open_input(args: &Args) -> Result<Box<dyn InputSource + Send>> {
    match args.input {
        InputBackend::Script => {
            let script = match &args.script {
                Some(path) => ScriptedInput::from_file(path)
                    .with_context(|| format!("loading input script {}", path.display()))?,
                None => ScriptedInput::demo(),
            };
            Ok(Box::new(script))
        }
        InputBackend::Gamepad => open_gamepad(args),
    }
}

#[cfg(feature = "gilrs")]
fn open_gamepad(args: &Args) -> Result<Box<dyn InputSource + Send>> {
    if args.script.is_some() {
        warn!("--script is ignored with the gamepad backend");
    }
    let gamepad = teleop_library::GamepadInput::new().context("opening gamepad")?;
    Ok(Box::new(gamepad))
}

#[cfg(not(feature = "gilrs"))]
fn open_gamepad(args: &Args) -> Result<Box<dyn InputSource + Send>> {
    if args.script.is_some() {
        warn!("--script is ignored with the gamepad backend");
    }
    bail!("gamepad input requires building with the 'gilrs' feature")
}
