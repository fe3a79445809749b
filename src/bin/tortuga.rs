use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tortuga", version)]
struct Cli {
    /// Log engine activity at debug level (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a turtle program headlessly and write the final frame as a PNG.
    Render(RenderArgs),
    /// Parse and validate a turtle program.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input program JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width in pixels (defaults to the program's surface width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (defaults to the program's surface height).
    #[arg(long)]
    height: Option<u32>,

    /// Leave actor glyphs out of the output.
    #[arg(long)]
    no_overlay: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input program JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tortuga=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_program(path: &std::path::Path) -> anyhow::Result<tortuga::Program> {
    let mut program = tortuga::Program::from_json_file(path)
        .with_context(|| format!("load program '{}'", path.display()))?;
    program.config = program.config.with_env_overrides();
    Ok(program)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut program = read_program(&args.in_path)?;

    let width = args
        .width
        .unwrap_or(program.config.surface_width.round() as u32);
    let height = args
        .height
        .unwrap_or(program.config.surface_height.round() as u32);
    program.config.surface_width = f64::from(width);
    program.config.surface_height = f64::from(height);

    let mut canvas = tortuga::CpuCanvas::new(width, height)?;
    let mut overlay = tortuga::CpuCanvas::new(width, height)?;
    let stats = tortuga::run_program(&program, &mut canvas, &mut overlay)?;

    let background = program.background.unwrap_or(tortuga::Color::WHITE);
    let frame = if args.no_overlay {
        tortuga::flatten(background, &mut [&mut canvas])?
    } else {
        tortuga::flatten(background, &mut [&mut canvas, &mut overlay])?
    };
    frame.write_png(&args.out)?;

    if !stats.idle {
        eprintln!(
            "warning: stopped after {} frames with commands still queued",
            stats.frames
        );
    }
    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames);
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let program = read_program(&args.in_path)?;
    println!(
        "ok: {} actors, {} ops, {} fps",
        program.actors.len(),
        program.op_count(),
        program.fps
    );
    Ok(())
}
