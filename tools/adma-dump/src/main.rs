//! Host-side inspector for uSDHC ADMA2 descriptor tables.
//!
//! Usage:
//!   adma-dump build --address 0x88000000 --length 70000   - Print the table for one transfer
//!   adma-dump build ... --output table.bin                - Also write the raw table
//!   adma-dump decode table.bin                            - Parse and print a raw table
//!   adma-dump plan transfers.toml                         - Print the table for every planned transfer
//!
//! Pass `-v` / `-vv` to see the builder's debug / trace log on stderr.

mod args;
mod plan;
mod render;

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use usdhc_adma::DescriptorChain;
use usdhc_adma::log::{LogLevel, set_log_fn};

use crate::plan::Plan;

#[derive(Parser)]
#[command(name = "adma-dump")]
#[command(about = "Build, decode and inspect uSDHC ADMA2 descriptor tables")]
struct Cli {
    /// Show builder log output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and print the descriptor table for one transfer
    Build {
        /// Physical start address of the data buffer (decimal or 0x hex)
        #[arg(short, long, value_parser = args::parse_u32)]
        address: u32,

        /// Transfer length in bytes (decimal or 0x hex)
        #[arg(short, long, value_parser = args::parse_usize)]
        length: usize,

        /// Also write the raw table bytes to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and print a raw descriptor table
    Decode {
        /// File holding the raw table bytes
        file: PathBuf,
    },

    /// Build and print the tables for every transfer in a TOML plan
    Plan {
        /// Plan file with one `[[transfer]]` table per transfer
        file: PathBuf,
    },
}

/// Most verbose level forwarded to stderr.
static VERBOSITY: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);

fn stderr_log(level: LogLevel, args: fmt::Arguments<'_>) {
    if level as u8 <= VERBOSITY.load(Ordering::Relaxed) {
        eprintln!("[{}] {}", level.name(), args);
    }
}

/// Maps the `-v` count to the most verbose level shown.
fn verbosity_level(verbose: u8) -> LogLevel {
    match verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

fn install_logger(verbose: u8) {
    VERBOSITY.store(verbosity_level(verbose) as u8, Ordering::Relaxed);
    // SAFETY: `stderr_log` only reads an atomic and writes to stderr, which
    // is safe from any thread.
    unsafe { set_log_fn(stderr_log) };
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_logger(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Build {
            address,
            length,
            output,
        } => {
            let chain = DescriptorChain::build(address, length).with_context(|| {
                format!("Failed to build table for {length} bytes at {address:#010x}")
            })?;
            render::print_chain(&mut out, &chain)?;
            if let Some(path) = output {
                std::fs::write(&path, chain.to_bytes())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                writeln!(out, "Wrote: {}", path.display())?;
            }
        }

        Commands::Decode { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let chain = DescriptorChain::from_bytes(&bytes)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            render::print_chain(&mut out, &chain)?;
        }

        Commands::Plan { file } => {
            let plan = Plan::load(&file)?;
            let mut failed = 0usize;
            for transfer in &plan.transfers {
                writeln!(out, "{}:", transfer.name)?;
                match transfer.build() {
                    Ok(chain) => render::print_chain(&mut out, &chain)?,
                    Err(e) => {
                        writeln!(out, "  error: {e}")?;
                        failed += 1;
                    }
                }
                writeln!(out)?;
            }
            if failed > 0 {
                bail!("{failed} transfer(s) in {} could not be built", file.display());
            }
        }
    }

    Ok(())
}
