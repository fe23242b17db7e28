use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use folio::{
    BeamConfig, FolioConfig, HeadlessCanvas, HeadlessHost, Host, Intensity, RendererOpts, Size,
    Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "folio", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render frames of a beam background as PNGs.
    Beams(BeamsArgs),
    /// Validate a page configuration and print a summary.
    Check(CheckArgs),
    /// Print the scroll offset the carousel moves to after a card closes.
    Resync(ResyncArgs),
}

#[derive(Parser, Debug)]
struct BeamsArgs {
    /// Output directory; frames are written as `beams_NNNN.png`.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames to render.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value_t = 384.0)]
    width: f64,

    #[arg(long, default_value_t = 240.0)]
    height: f64,

    /// Device pixel ratio of the surface.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// subtle, medium or strong.
    #[arg(long, default_value = "medium")]
    intensity: Intensity,

    #[arg(long)]
    seed: Option<u64>,

    /// Blur radius in logical pixels.
    #[arg(long)]
    blur: Option<f64>,

    /// Keep the background transparent instead of black.
    #[arg(long, default_value_t = false)]
    transparent: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Page configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ResyncArgs {
    /// Index of the card that closed.
    #[arg(long)]
    index: usize,

    #[arg(long)]
    viewport_width: f64,

    /// Page configuration JSON; the built-in layout is used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Beams(args) => cmd_beams(args),
        Command::Check(args) => cmd_check(args),
        Command::Resync(args) => cmd_resync(args),
    }
}

fn cmd_beams(args: BeamsArgs) -> anyhow::Result<()> {
    let defaults = BeamConfig::default();
    let config = BeamConfig {
        intensity: args.intensity,
        blur_px: args.blur.unwrap_or(defaults.blur_px),
        seed: args.seed.unwrap_or(defaults.seed),
    };
    let viewport = Viewport::new(args.width, args.height, args.dpr)?;
    let host = Rc::new(HeadlessHost::new(viewport));
    let dyn_host: Rc<dyn Host> = host.clone();
    let canvas = Rc::new(RefCell::new(HeadlessCanvas::new(Size::new(
        args.width,
        args.height,
    ))));

    let clear = (!args.transparent).then_some([0, 0, 0, 255]);
    let opts = RendererOpts::default().with_clear_rgba(clear);
    let handle = folio::start_beams(&dyn_host, canvas.clone(), config, opts)?
        .context("beam surface could not be initialized")?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    for i in 0..args.frames {
        host.run_frame();
        let canvas = canvas.borrow();
        let frame = canvas
            .last_frame()
            .with_context(|| format!("frame {i} was not presented"))?;
        let path = args.out.join(format!("beams_{i:04}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.to_straight_rgba8(),
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
    }

    eprintln!(
        "wrote {} frame(s) of {} beams to {}",
        handle.frames(),
        handle.beam_count(),
        args.out.display()
    );
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<FolioConfig> {
    let config = FolioConfig::from_path(path)?;
    config
        .validate()
        .with_context(|| format!("invalid config '{}'", path.display()))?;
    Ok(config)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = load(&args.in_path)?;
    println!("{} ({})", config.header.name, config.header.subtitle);
    println!("{}: {} card(s)", config.header.section_title, config.cards.len());
    for (i, card) in config.cards.iter().enumerate() {
        println!("  [{i}] {} -> {}", card.title, card.link);
    }
    Ok(())
}

fn cmd_resync(args: ResyncArgs) -> anyhow::Result<()> {
    let config = match &args.in_path {
        Some(path) => load(path)?,
        None => FolioConfig::default(),
    };
    anyhow::ensure!(
        args.viewport_width.is_finite() && args.viewport_width > 0.0,
        "viewport width must be finite and > 0"
    );
    let offset = config
        .carousel
        .layout
        .resync_offset(args.viewport_width, args.index);
    println!("{offset}");
    Ok(())
}
