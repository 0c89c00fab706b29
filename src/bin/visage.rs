use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "visage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a character snapshot to a frame description (JSON).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input character snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output frame JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override the portrait seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Expression override, e.g. "scowl" or "surprise".
    #[arg(long)]
    expression: Option<String>,

    /// Ignore the equipped-item map and render from appearance alone.
    #[arg(long, default_value_t = false)]
    no_equipment: bool,

    /// Static mode: no blink/gaze/idle state.
    #[arg(long, default_value_t = false)]
    static_mode: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read snapshot '{}'", args.in_path.display()))?;
    let mut snapshot: visage::CharacterSnapshot =
        serde_json::from_str(&raw).context("parse snapshot JSON")?;
    if let Some(seed) = args.seed {
        snapshot.portrait_seed = Some(seed);
    }

    let expression = match args.expression.as_deref() {
        Some(name) => Some(
            visage::Expression::parse(name)
                .with_context(|| format!("unknown expression '{name}'"))?,
        ),
        None => None,
    };

    let options = visage::RenderOptions {
        use_equipped_items: !args.no_equipment,
        static_mode: args.static_mode,
        ..visage::RenderOptions::default()
    };

    let frame = visage::portrait(
        &snapshot,
        &options,
        expression,
        &visage::AnimationPose::default(),
    )?;
    let json = serde_json::to_string_pretty(&frame).context("serialize frame")?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json)
                .with_context(|| format!("write frame '{}'", out.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}
