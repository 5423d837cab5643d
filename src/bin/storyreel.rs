use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a job to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame of the assembled timeline as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job JSON: `{ "config": {...}, "scenes": [...] }`.
    #[arg(long)]
    job: PathBuf,

    /// Output MP4 path (overrides the job's `output_path`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Turn subtitles off.
    #[arg(long, default_value_t = false)]
    no_subtitles: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Print the render report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[arg(long)]
    job: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configure rayon thread pool")?;
    }

    let mut job = storyreel::Job::from_path(&args.job)?;
    if let Some(out) = args.out {
        job.config.output_path = out;
    }
    if args.no_subtitles {
        job.config.subtitles = false;
    }

    let composer = storyreel::Composer::new(job.config)?;
    let output = composer.compose(&job.scenes)?;
    for d in &output.report.degradations {
        match d.scene {
            Some(scene) => eprintln!("warning: scene {scene} {}: {}", d.stage, d.message),
            None => eprintln!("warning: {}: {}", d.stage, d.message),
        }
    }
    if args.report {
        println!("{}", serde_json::to_string_pretty(&output.report)?);
    }
    eprintln!(
        "wrote {} ({:.2}s)",
        output.path.display(),
        output.report.duration_secs
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = storyreel::Job::from_path(&args.job)?;
    let composer = storyreel::Composer::new(job.config)?;
    let (master, _report) = composer.build_master(&job.scenes)?;
    let frame = master.render(args.frame)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
