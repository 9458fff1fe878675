//! Command-line interface definition for the bedsketch application.
//!
//! This file defines the `Cli` struct using the `clap` crate to parse and validate
//! command-line arguments. It includes options for the two BED files to compare, the
//! chromosome to restrict to, the sketching strategy and size, the hash family's prime
//! modulus and coefficient range, the random seed, and the number of threads. The CLI
//! output is styled using the `anstyle` crate for improved readability.

use std::path::PathBuf;

use clap::Parser;

use crate::hashing::{CHR_1_PRIME, CHR_1_SIZE};
use crate::sketch_params::Strategy;

const DEFAULT_QUEUE_SIZE: usize = 100;
const DEFAULT_SEED: u64 = 30;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(styles=get_styles())]
#[command(disable_help_subcommand = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// First BED file of intervals
    #[arg(short = 'a', long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub set_a: PathBuf,

    /// Second BED file of intervals
    #[arg(short = 'b', long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub set_b: PathBuf,

    /// Chromosome to compare
    #[arg(short, long, help_heading = "Inputs", default_value = "chr1")]
    pub chrom: String,

    /// Directory for the log file and results table
    #[arg(short = 'o', long, help_heading = "Output", value_parser = clap::value_parser!(PathBuf))]
    pub out_dir: Option<PathBuf>,

    /// Sketching strategy
    #[arg(
        long,
        help_heading = "Sketching parameters",
        value_enum,
        default_value_t = Strategy::BottomK
    )]
    pub strategy: Strategy,

    /// Positions retained per sketch (bottom-k), number of hash functions (matrix), or bins (oph)
    #[arg(
        short = 'k',
        long,
        help_heading = "Sketching parameters",
        default_value_t = DEFAULT_QUEUE_SIZE,
        value_parser = validate_queue_size
    )]
    pub queue_size: usize,

    /// Prime modulus of the hash family; must exceed the chromosome size
    #[arg(long, help_heading = "Sketching parameters", default_value_t = CHR_1_PRIME)]
    pub prime: u64,

    /// Chromosome size; hash coefficients are drawn from [0, chrom_size + 1]
    #[arg(long, help_heading = "Sketching parameters", default_value_t = CHR_1_SIZE)]
    pub chrom_size: u64,

    /// Seed used to draw hash coefficients
    #[arg(long, help_heading = "Sketching parameters", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of threads to use
    #[arg(short, long, default_value_t = 2, value_parser = validate_threads)]
    pub threads: usize,
}

fn validate_queue_size(k: &str) -> Result<usize, String> {
    let k: usize = k
        .parse()
        .map_err(|_| format!("`{k}` isn't a valid queue size"))?;

    if !(1..=1_000_000).contains(&k) {
        return Err("Queue size must be in the range [1, 1000000]".to_string());
    }

    Ok(k)
}

fn validate_threads(threads: &str) -> Result<usize, String> {
    let threads: usize = threads
        .parse()
        .map_err(|_| format!("`{threads}` isn't a valid value"))?;

    if !(1..=1024).contains(&threads) {
        return Err("Threads  must be in the range [1, 1024]".to_string());
    }

    Ok(threads)
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}
