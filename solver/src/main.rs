use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;
use paddock::Board;

/// Pen a horse into the largest possible paddock with a limited wall budget.
///
/// Reads a grid of `.` (grass), `#` (rock) and `H` (the horse) from a file
/// or stdin, places at most BUDGET walls so the horse cannot reach the rim,
/// and prints the walled grid with the reachable grass marked.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Maximum number of walls to place
    #[arg(short = 'k', long = "budget", default_value_t = 6)]
    budget: usize,

    /// Emit the result as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Grid file; stdin when omitted
    grid: Option<PathBuf>,
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                log::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let text = match &args.grid {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let board: Board = text.parse()?;
    let (rows, cols) = board.dims();
    info!("{rows}x{cols} board, budget {}", args.budget);

    let enclosure = board.solve(args.budget);
    let walls = enclosure.walls.iter().map(|w| (w.0, w.1)).collect::<Vec<_>>();

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "area": enclosure.area,
                "walls": walls,
                "grid": board.render(&enclosure).lines().collect::<Vec<_>>(),
            })
        );
    } else {
        println!("max enclosed area: {}", enclosure.area);
        println!("walls: {walls:?}");
        print!("{}", board.render(&enclosure));
    }

    Ok(())
}
