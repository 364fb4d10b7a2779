//! SyReC Command-Line Interface
//!
//! The main entry point for the `syrec` tool: synthesize SyReC programs
//! into reversible circuits, simulate them and inspect their reversal.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{check, reverse, simulate, synth, version};

/// SyReC - synthesis of reversible circuits from SyReC programs
#[derive(Parser)]
#[command(name = "syrec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a SyReC program into a reversible circuit
    Synth {
        /// Input file (SyReC source)
        #[arg(short, long)]
        input: String,

        /// Output file (.real or .json); prints the gate list if omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Assignment strategy (additional, no-additional)
        #[arg(short, long, default_value = "additional")]
        strategy: String,

        /// Module to synthesize (defaults to `main`, then the first module)
        #[arg(short, long)]
        main: Option<String>,

        /// Bit-width of variables declared without one
        #[arg(long, default_value = "32")]
        bitwidth: u32,
    },

    /// Synthesize a program and simulate one input pattern
    Simulate {
        /// Input file (SyReC source)
        #[arg(short, long)]
        input: String,

        /// Input pattern, one bit per line, line 0 first
        #[arg(short, long)]
        bits: String,

        /// Assignment strategy (additional, no-additional)
        #[arg(short, long, default_value = "additional")]
        strategy: String,

        /// Module to synthesize (defaults to `main`, then the first module)
        #[arg(short, long)]
        main: Option<String>,

        /// Bit-width of variables declared without one
        #[arg(long, default_value = "32")]
        bitwidth: u32,
    },

    /// Print a module with its statements reversed
    Reverse {
        /// Input file (SyReC source)
        #[arg(short, long)]
        input: String,

        /// Module to reverse (defaults to `main`, then the first module)
        #[arg(short, long)]
        module: Option<String>,

        /// Bit-width of variables declared without one
        #[arg(long, default_value = "32")]
        bitwidth: u32,
    },

    /// Parse and check a program without synthesizing it
    Check {
        /// Input file (SyReC source)
        #[arg(short, long)]
        input: String,

        /// Bit-width of variables declared without one
        #[arg(long, default_value = "32")]
        bitwidth: u32,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Synth {
            input,
            output,
            strategy,
            main,
            bitwidth,
        } => synth::execute(
            &input,
            output.as_deref(),
            &strategy,
            main.as_deref(),
            bitwidth,
        ),

        Commands::Simulate {
            input,
            bits,
            strategy,
            main,
            bitwidth,
        } => simulate::execute(&input, &bits, &strategy, main.as_deref(), bitwidth),

        Commands::Reverse {
            input,
            module,
            bitwidth,
        } => reverse::execute(&input, module.as_deref(), bitwidth),

        Commands::Check { input, bitwidth } => check::execute(&input, bitwidth),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
