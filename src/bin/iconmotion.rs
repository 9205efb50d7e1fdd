use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "iconmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the variants of one animation from a variant map.
    Resolve(ResolveArgs),
    /// Scale every transition of a variant tree by a speed multiplier.
    Scale(ScaleArgs),
    /// Replay a scenario and print driver calls and controller events as JSON lines.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Variant map JSON (must contain a `default` entry).
    #[arg(long)]
    variants: PathBuf,

    /// Animation name to select. Unknown names fall back to `default`.
    #[arg(long, default_value = iconmotion::DEFAULT_ANIMATION)]
    animation: String,

    /// Speed multiplier applied to durations and delays.
    #[arg(long, default_value_t = iconmotion::DEFAULT_SPEED_MULTIPLIER)]
    speed: f64,
}

#[derive(Parser, Debug)]
struct ScaleArgs {
    /// Input variant tree JSON. Only `transition` objects inside it are rescaled.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Speed multiplier applied to durations and delays.
    #[arg(long)]
    speed: f64,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Scale(args) => cmd_scale(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_json(path: &Path, what: &str) -> anyhow::Result<serde_json::Value> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    let value = serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))?;
    Ok(value)
}

fn check_speed(speed: f64) -> anyhow::Result<()> {
    if !speed.is_finite() || speed <= 0.0 {
        anyhow::bail!("--speed must be finite and > 0, got {speed}");
    }
    Ok(())
}

fn print_pretty(value: &serde_json::Value) -> anyhow::Result<()> {
    let mut out = BufWriter::new(std::io::stdout().lock());
    serde_json::to_writer_pretty(&mut out, value).context("write JSON")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    check_speed(args.speed)?;
    let map = iconmotion::VariantMap::from_value(read_json(&args.variants, "variant map")?)?;
    let resolved = map.resolve(&args.animation, Some(args.speed));
    print_pretty(&resolved)
}

fn cmd_scale(args: ScaleArgs) -> anyhow::Result<()> {
    check_speed(args.speed)?;
    let tree = read_json(&args.in_path, "variant tree")?;
    print_pretty(&iconmotion::scale_tree(&tree, args.speed))
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read scenario '{}'", args.in_path.display()))?;
    let scenario = iconmotion::Scenario::from_json_str(&text)?;
    let records = scenario.run()?;

    let mut out = BufWriter::new(std::io::stdout().lock());
    for record in &records {
        serde_json::to_writer(&mut out, record).context("write record")?;
        writeln!(out)?;
    }
    out.flush()?;
    eprintln!("{} records", records.len());
    Ok(())
}
