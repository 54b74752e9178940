use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use storyreel::{
    Canvas, FfmpegSink, FfmpegSinkOpts, FrameIndex, MotionPolicy, RenderJob, TracingObserver,
};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version, about = "Animate still images into a short video")]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

/// Inputs and settings shared by every subcommand. Flags override the job file.
#[derive(Args, Debug)]
struct JobArgs {
    /// JSON render job (`images` plus any settings).
    #[arg(long)]
    job: Option<PathBuf>,

    /// Input image, in narrative order. Repeat per scene; replaces the job's images.
    #[arg(short, long = "image")]
    images: Vec<PathBuf>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Seconds per scene.
    #[arg(long)]
    scene_duration: Option<f64>,

    /// Seconds per transition.
    #[arg(long)]
    transition_duration: Option<f64>,

    /// Color style: warm, cool, vintage, cyberpunk or neutral.
    #[arg(long)]
    style: Option<String>,

    /// Transition: crossfade, wipe_left or zoom_blur.
    #[arg(long)]
    transition: Option<String>,

    /// Output size as WIDTHxHEIGHT (defaults to the first image's size).
    #[arg(long, value_parser = parse_size)]
    size: Option<Canvas>,

    /// Peak Ken Burns zoom factor.
    #[arg(long)]
    zoom: Option<f64>,

    /// Seed for per-scene motion selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable zoom/pan motion.
    #[arg(long)]
    no_ken_burns: bool,

    /// Use parallax motion (only when Ken Burns is disabled).
    #[arg(long)]
    parallax: bool,

    /// Disable color grading.
    #[arg(long)]
    no_color_grade: bool,

    /// Rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: JobArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// x264 constant rate factor.
    #[arg(long, default_value_t = 20)]
    crf: u8,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: JobArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::WARN,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_job(args: JobArgs) -> anyhow::Result<RenderJob> {
    let mut job = match &args.job {
        Some(path) => RenderJob::from_json_file(path)?,
        None => RenderJob::default(),
    };

    if !args.images.is_empty() {
        job.images = args.images;
    }
    let cfg = &mut job.config;
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(secs) = args.scene_duration {
        cfg.scene_duration = secs;
    }
    if let Some(secs) = args.transition_duration {
        cfg.transition_duration = secs;
    }
    if let Some(style) = args.style {
        cfg.color_style = style;
    }
    if let Some(transition) = args.transition {
        cfg.transition_type = transition;
    }
    if args.size.is_some() {
        cfg.target_size = args.size;
    }
    if let Some(zoom) = args.zoom {
        cfg.zoom_amount = zoom;
    }
    if let Some(seed) = args.seed {
        cfg.motion = MotionPolicy::Seeded { seed };
    }
    if args.no_ken_burns {
        cfg.use_ken_burns = false;
    }
    if args.parallax {
        cfg.use_parallax = true;
    }
    if args.no_color_grade {
        cfg.use_color_grade = false;
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }

    if job.images.is_empty() {
        anyhow::bail!("no input images: pass --image or a --job with `images`");
    }
    Ok(job)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut job = build_job(args.input)?;
    if let Some(out) = args.out {
        job.config.output_path = out;
    }

    storyreel::check_mp4_canvas(&job.images, &job.config)?;

    let mut sink_opts = FfmpegSinkOpts::new(&job.config.output_path);
    sink_opts.overwrite = !args.no_overwrite;
    sink_opts.crf = args.crf;
    let mut sink = FfmpegSink::new(sink_opts);

    let stats =
        storyreel::render_video(&job.images, &job.config, &mut sink, &mut TracingObserver)?;

    eprintln!(
        "wrote {} ({} frames, {}, {:.2}s)",
        job.config.output_path.display(),
        stats.frames_total,
        stats.canvas,
        stats.duration_secs
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = build_job(args.input)?;
    let frame = storyreel::render_frame_at(&job.images, &job.config, FrameIndex(args.frame))?;

    storyreel::ensure_parent_dir(&args.out)?;
    frame
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn parse_size(s: &str) -> Result<Canvas, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("width: {e}"))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("height: {e}"))?;
    Ok(Canvas { width, height })
}
