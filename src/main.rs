//! Reads a batch script and prints one line per command.
//!
//! ```text
//! $ printf '1\n3\ninsert 40\ninsert 20\nrank 20\n' | avl-cli
//! 1
//! 2
//! 2 1
//! ```

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rank_avl::command::{parse_script, run_batch};

#[derive(Parser, Debug)]
#[command(author, version, about = "Runs batches of commands against a rank-augmented AVL tree", long_about = None)]
struct Args {
    /// Script to run; stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Log at debug level (`RUST_LOG` still wins).
    #[arg(short, long)]
    verbose: bool,
}

fn read_script(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading script {}", path.display())),
        None => {
            let mut script = String::new();
            io::stdin().read_to_string(&mut script).context("reading script from stdin")?;
            Ok(script)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    env_logger::builder().filter_level(log_level).parse_default_env().init();

    let script = read_script(args.input.as_deref())?;
    let batches = parse_script(&script).context("parsing script")?;
    info!("running {} batches", batches.len());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (i, batch) in batches.iter().enumerate() {
        debug!("batch {} has {} commands", i + 1, batch.len());
        for reply in run_batch(batch) {
            writeln!(out, "{reply}").context("writing reply")?;
        }
    }
    out.flush().context("flushing output")?;

    Ok(())
}
