use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "routeplay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print per-route and fleet metrics as JSON.
    Metrics(MetricsArgs),
    /// Run headless playback and print one JSON line per frame.
    Simulate(SimulateArgs),
    /// Render the map scene at a given vehicle and progress as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct MetricsArgs {
    /// Input solution JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input solution JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of 60 Hz frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Speed multiplier (clamped to the configured range).
    #[arg(long, default_value_t = 1)]
    speed: u8,

    /// Starting vehicle index.
    #[arg(long, default_value_t = 0)]
    vehicle: usize,

    /// Play every vehicle in sequence.
    #[arg(long)]
    autoplay: bool,

    /// Follow the vehicle with the camera.
    #[arg(long)]
    cinematic: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input solution JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Vehicle index.
    #[arg(long, default_value_t = 0)]
    vehicle: usize,

    /// Playback progress in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Follow the vehicle with the camera.
    #[arg(long)]
    cinematic: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Output height.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

const FRAME_MS: f64 = 1000.0 / 60.0;
const SETTLE_MS: f64 = 10_000.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Metrics(args) => cmd_metrics(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_solution_json(path: &Path) -> anyhow::Result<routeplay::SolutionDef> {
    let f = File::open(path).with_context(|| format!("open solution '{}'", path.display()))?;
    let r = BufReader::new(f);
    let def: routeplay::SolutionDef =
        serde_json::from_reader(r).with_context(|| "parse solution JSON")?;
    Ok(def)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<routeplay::EngineConfig> {
    let cfg = match path {
        Some(p) => routeplay::EngineConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => routeplay::EngineConfig::default(),
    }
    .with_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_metrics(args: MetricsArgs) -> anyhow::Result<()> {
    let def = read_solution_json(&args.in_path)?;
    let cfg = load_config(args.config.as_deref())?;
    let fleet = routeplay::Fleet::from_solution(&def, &cfg)?;
    let metrics = routeplay::compute_fleet_metrics(fleet.routes());

    let routes: Vec<_> = metrics
        .routes
        .iter()
        .map(|m| {
            serde_json::json!({
                "route_id": m.route_id,
                "vehicle_number": m.vehicle_number,
                "color": m.color,
                "cost": m.cost,
                "distance_km": m.distance_km,
                "stops": m.stops,
                "quality": metrics.quality_of(m, &cfg.metrics).label(),
            })
        })
        .collect();
    let out = serde_json::json!({
        "routes": routes,
        "total_cost": metrics.total_cost,
        "avg_cost": metrics.avg_cost,
        "avg_stops": metrics.avg_stops,
        "total_distance_km": metrics.total_distance_km,
        "best": metrics.best.as_ref().map(|m| &m.route_id),
        "worst": metrics.worst.as_ref().map(|m| &m.route_id),
        "longest": metrics.longest.as_ref().map(|m| &m.route_id),
    });

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let def = read_solution_json(&args.in_path)?;
    let cfg = load_config(args.config.as_deref())?;
    let mut session =
        routeplay::PlaybackSession::from_solution(&def, cfg, routeplay::RecordingRenderer::new())?;
    session.scene_ready();

    use routeplay::Intent;
    session.apply(Intent::SelectVehicle(args.vehicle), 0.0);
    session.apply(Intent::SetSpeed(args.speed), 0.0);
    session.apply(Intent::SetCinematic(args.cinematic), 0.0);
    session.apply(Intent::SetAutoplayFleet(args.autoplay), 0.0);
    session.apply(Intent::Play, 0.0);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for i in 1..=args.frames {
        let snap = session.tick(f64::from(i) * FRAME_MS);
        serde_json::to_writer(&mut out, &snap)?;
        writeln!(out)?;
    }
    session.dispose();
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let def = read_solution_json(&args.in_path)?;
    let cfg = load_config(args.config.as_deref())?;
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within [0, 1]");
    }

    let renderer = routeplay::CpuMapRenderer::new(routeplay::CpuRenderOpts {
        width: args.width,
        height: args.height,
        ..routeplay::CpuRenderOpts::default()
    });
    let mut session = routeplay::PlaybackSession::from_solution(&def, cfg, renderer)?;
    if args.vehicle >= session.fleet().len().max(1) {
        anyhow::bail!(
            "--vehicle {} is out of range ({} routes)",
            args.vehicle,
            session.fleet().len()
        );
    }
    session.scene_ready();

    use routeplay::Intent;
    session.apply(Intent::SelectVehicle(args.vehicle), 0.0);
    session.apply(Intent::SetCinematic(args.cinematic), 0.0);
    session.apply(Intent::Scrub(args.progress), 0.0);
    session.tick(0.0);
    session.tick(SETTLE_MS);

    let frame = session.scene().renderer().render()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let rgba = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        &args.out,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
