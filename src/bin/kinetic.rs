use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use kinetic::{
    ActionManager, BezierConfig, Ease, FiniteAction, ManagerOpts, Node, NodeStore, Vec2, ops,
};

#[derive(Parser, Debug)]
#[command(name = "kinetic", version)]
struct Cli {
    /// Log action lifecycle events to stderr.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample an easing curve and print it as JSON.
    Curve(CurveArgs),
    /// Run a built-in action tree and print the node state after every tick.
    Trace(TraceArgs),
}

#[derive(Parser, Debug)]
struct CurveArgs {
    /// Curve name, e.g. `sine_in_out` or `elastic_out`.
    #[arg(long)]
    ease: String,

    /// Rate for `in`/`out`/`in_out`, period for the elastic family.
    #[arg(long)]
    param: Option<f64>,

    /// Number of samples (including both endpoints).
    #[arg(long, default_value_t = 11)]
    samples: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Demo {
    Jump,
    Spline,
    PingPong,
    Bounce,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    #[arg(long, value_enum)]
    demo: Demo,

    /// Ticks per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Manager options JSON (`time_scale`, `max_step`).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Curve(args) => cmd_curve(args),
        Command::Trace(args) => cmd_trace(args),
    }
}

fn cmd_curve(args: CurveArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.samples >= 2, "--samples must be >= 2");
    let ease = Ease::by_name(&args.ease, args.param)?;

    let last = (args.samples - 1) as f64;
    let points: Vec<serde_json::Value> = (0..args.samples)
        .map(|i| {
            let t = i as f64 / last;
            serde_json::json!({ "t": t, "value": ease.apply(t) })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}

fn demo_action(demo: Demo) -> anyhow::Result<FiniteAction> {
    let action = match demo {
        Demo::Jump => ops::jump_by(2.0, Vec2::new(200.0, 0.0), 50.0, 3)?,
        Demo::Spline => {
            let path = ops::catmull_rom_by(
                2.0,
                vec![
                    Vec2::ZERO,
                    Vec2::new(100.0, 50.0),
                    Vec2::new(200.0, 0.0),
                    Vec2::new(100.0, -50.0),
                ],
            )?;
            let back = path.reverse()?;
            ops::sequence(vec![path, back])?
        }
        Demo::PingPong => {
            let there = ops::ease(
                ops::bezier_by(
                    1.0,
                    BezierConfig {
                        control_1: Vec2::new(0.0, 80.0),
                        control_2: Vec2::new(150.0, 80.0),
                        end: Vec2::new(150.0, 0.0),
                    },
                )?,
                Ease::SineInOut,
            )?;
            let spin = ops::rotate_by(1.0, 180.0)?;
            let leg = ops::spawn(vec![there, spin])?;
            let back = leg.reverse()?;
            ops::repeat(ops::sequence(vec![leg, back])?, 2)?
        }
        Demo::Bounce => {
            let drop = ops::ease(ops::move_by(1.5, Vec2::new(0.0, -120.0))?, Ease::BounceOut)?;
            let squash = ops::sequence(vec![
                ops::delay_time(1.0)?,
                ops::scale_to_xy(0.25, Vec2::new(1.2, 0.8))?,
                ops::scale_to(0.25, 1.0)?,
            ])?;
            ops::sequence(vec![ops::spawn(vec![drop, squash])?, ops::fade_out(0.5)?])?
        }
    };
    Ok(action)
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be a positive number"
    );
    let opts = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str::<ManagerOpts>(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => ManagerOpts::default(),
    };

    let mut nodes = NodeStore::new();
    let id = nodes.insert(Node::at(0.0, 120.0));
    let mut manager = ActionManager::with_opts(opts)?;
    manager.add(demo_action(args.demo)?, id, &mut nodes)?;

    let dt = 1.0 / args.fps;
    // Hard stop for time scales that never let the action finish.
    let max_ticks = (args.fps * 600.0).ceil() as u64;
    let mut tick = 0u64;
    while !manager.is_empty() && tick < max_ticks {
        manager.update(dt, &mut nodes)?;
        let node = nodes.get(id).context("demo node vanished")?;
        let line = serde_json::json!({
            "tick": tick,
            "position": [node.position.x, node.position.y],
            "rotation": node.rotation.x,
            "scale": [node.scale.x, node.scale.y],
            "opacity": node.opacity,
        });
        println!("{line}");
        tick += 1;
    }
    Ok(())
}
