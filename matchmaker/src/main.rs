use anyhow::Context;
use clap::Parser;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use toadcore::store::save_matches;
use toadcore::toads::DetectionRecord;
use workflow::config::MatchmakerConfig;
use workflow::runner::{Runner, WorkflowResult};

mod generator;
mod toadfile;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Match detections of the same transmission across receivers"
)]
struct Args {
    /// .toads detection data ('-' reads from stdin)
    #[arg(default_value = "data.toads")]
    input: String,
    /// Output match file ('-' writes to stdout)
    #[arg(short, long, default_value = "data.match")]
    output: String,
    /// Size of the timestamp window in seconds
    #[arg(short, long, default_value_t = 0.2)]
    window: f64,
    /// Minimum number of receivers that should detect a transmission for a
    /// match to be valid
    #[arg(short = 'n', long = "num-matches", default_value_t = 2)]
    num_matches: usize,
    /// Load matching settings from a YAML config instead of the flags
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON run summary to this path
    #[arg(long)]
    report: Option<PathBuf>,
    /// Match a generated synthetic scenario instead of reading input
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    /// Seed for the synthetic scenario generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print a diagnostic line for every collision
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Serialize)]
struct RunReport {
    detections: usize,
    matches: usize,
    misses: usize,
    collisions: usize,
    matrix_rows: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MatchmakerConfig::load(path)?,
        None => MatchmakerConfig::from_args(args.window, args.num_matches),
    };

    let mut toads = if args.synthetic {
        generator::build_toad_set(&generator::ScenarioConfig {
            seed: args.seed,
            ..Default::default()
        })?
    } else {
        load_input(&args.input)?
    };
    toadfile::sort_by_timestamp(&mut toads);
    info!("matching {} detections", toads.len());

    let runner = Runner::new(config);
    let result = runner.execute(&toads)?;

    if args.verbose {
        for collision in &result.match_set.collisions {
            let loser = &toads[collision.loser];
            eprintln!(
                "Multiple detections for RX {} and TX {}: #{} loses to #{}",
                loser.rxid, loser.txid, collision.loser, collision.winner
            );
        }
    }

    write_output(&args.output, &result)?;

    if let Some(path) = &args.report {
        let report = RunReport {
            detections: toads.len(),
            matches: result.match_set.matches.len(),
            misses: result.match_set.misses.len(),
            collisions: result.match_set.collisions.len(),
            matrix_rows: result.matrix_rows,
        };
        let file = File::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .context("writing run report")?;
    }

    print_summary(&result, args.output == "-");
    Ok(())
}

fn load_input(input: &str) -> anyhow::Result<Vec<DetectionRecord>> {
    if input == "-" {
        toadfile::load_toads(io::stdin().lock()).context("reading detections from stdin")
    } else {
        let file =
            File::open(input).with_context(|| format!("opening detection file {}", input))?;
        toadfile::load_toads(BufReader::new(file))
            .with_context(|| format!("reading detection file {}", input))
    }
}

fn write_output(output: &str, result: &WorkflowResult) -> anyhow::Result<()> {
    if output == "-" {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        save_matches(&result.match_set.matches, &mut writer).context("writing matches to stdout")
    } else {
        let file =
            File::create(output).with_context(|| format!("creating match file {}", output))?;
        let mut writer = BufWriter::new(file);
        save_matches(&result.match_set.matches, &mut writer)
            .with_context(|| format!("writing match file {}", output))?;
        writer.flush().context("flushing match file")?;
        Ok(())
    }
}

// Counts go to stderr when the match data itself occupies stdout.
fn print_summary(result: &WorkflowResult, output_is_stdout: bool) {
    let mut lines = vec![
        format!("Number of matches: {}", result.match_set.matches.len()),
        format!("Number of misses: {}", result.match_set.misses.len()),
        format!("Number of collisions: {}", result.match_set.collisions.len()),
    ];
    if let Some(rows) = result.matrix_rows {
        lines.push(format!("Usable matrix rows: {}", rows));
    }
    for line in lines {
        if output_is_stdout {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}
