//! CLI entry point for banker-sim
//!
//! Supports two execution modes:
//! - Interactive: Read instructions from stdin line-by-line
//! - Batch: Read instructions from a playbook file
//!
//! # Examples
//!
//! Interactive mode:
//! ```bash
//! ./banker-sim --scenario simple
//! > CHECK
//! > REQUEST 0 1,0
//! > ^D
//! ```
//!
//! Batch mode:
//! ```bash
//! ./banker-sim --playbook scenario.banker
//! ```

use banker_interactive::{Instruction, SessionHandler};
use clap::Parser;
use std::convert::TryFrom;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "banker-sim")]
#[command(about = "Execute deadlock-avoidance simulation scenarios", long_about = None)]
struct Args {
    /// Path to a playbook file containing instructions to execute (batch mode)
    #[arg(short, long)]
    playbook: Option<String>,

    /// Preset scenario to load before any instruction runs (simple | deadlock)
    #[arg(short, long)]
    scenario: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info")).unwrap();
    fmt().with_writer(std::io::stdout).with_target(false).with_env_filter(filter).init();

    let args = Args::parse();

    let mut handler = SessionHandler::default();

    if let Some(name) = args.scenario {
        let preload = Instruction::try_from(format!("SCENARIO {name}"))?;
        handler.execute(&preload).await?;
    }

    if let Some(playbook_path) = args.playbook {
        // Batch mode: read from file
        run_batch_mode(&mut handler, &playbook_path).await?;
    } else {
        // Interactive mode: read from stdin
        run_interactive_mode(&mut handler).await?;
    }

    Ok(())
}

/// Run in batch mode, reading instructions from a file
async fn run_batch_mode(handler: &mut SessionHandler, file_path: &str) -> anyhow::Result<()> {
    info!("Running batch mode from file: {}", file_path);

    let file = std::fs::File::open(file_path)?;
    let reader = io::BufReader::new(file);

    let start_time = std::time::Instant::now();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        debug!("[{}] {} ... ", line_num + 1, line);
        io::stdout().flush()?;

        match Instruction::try_from(line) {
            Ok(instruction) => {
                if let Err(e) = handler.execute(&instruction).await {
                    info!("✗ Error: {}", e);
                    return Err(e);
                }
            }
            Err(e) => {
                info!("✗ Parse error: {}", e);
                return Err(anyhow::anyhow!("{}", e));
            }
        }
    }

    info!(execution_time = ?start_time.elapsed(), "Batch execution completed successfully.");
    Ok(())
}

/// Run in interactive mode, reading instructions from stdin
async fn run_interactive_mode(handler: &mut SessionHandler) -> anyhow::Result<()> {
    println!("banker-sim - Interactive Mode");
    println!("==================================");
    println!("Press Ctrl+D to exit, HELP for instructions");
    println!();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let bytes_read = reader.read_line(&mut line)?;

        // EOF reached
        if bytes_read == 0 {
            println!();
            println!("Goodbye!");
            break;
        }

        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Parse and execute instruction
        match Instruction::try_from(trimmed) {
            Ok(instruction) => {
                if let Err(e) = handler.execute(&instruction).await {
                    eprintln!("✗ Error: {}", e);
                    // Continue in interactive mode even after errors
                }
            }
            Err(e) => {
                eprintln!("✗ Parse error: {}", e);
            }
        }
    }

    Ok(())
}
