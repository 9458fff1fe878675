//! Main entry point for the bedsketch application.
//!
//! This file handles command-line parsing, logging setup, and orchestrates the estimation of
//! the Jaccard similarity between the genomic positions covered by two BED files on a single
//! chromosome. The estimate is printed to stdout and, when an output directory is given,
//! also written to a results table alongside the log file.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::info;

use crate::bed::BedFile;
use crate::cli::Cli;
use crate::compare::compare_sets;
use crate::logging::setup_logger;
use crate::sketch_params::SketchParams;

mod cli;
pub mod bed;
pub mod bounded_queue;
pub mod compare;
pub mod error;
pub mod hashing;
pub mod interval;
pub mod io_utils;
pub mod jaccard;
pub mod logging;
pub mod min_hash;
pub mod progress;
pub mod sketch_params;

/// Common initialization required by all commands.
fn init(threads: usize) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    info!("{} v{}", env!("CARGO_PKG_NAME"), VERSION);
    info!("{}", env::args().collect::<Vec<String>>().join(" "));

    info!("Using {} threads.", threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    Ok(())
}

fn main() -> Result<()> {
    let start = Instant::now();

    let args = Cli::parse();

    if let Some(out_dir) = &args.out_dir {
        std::fs::create_dir_all(out_dir)?;
    }
    setup_logger(args.out_dir.as_deref())?;

    init(args.threads)?;

    let sketch_params = SketchParams::new(
        args.strategy,
        args.queue_size,
        args.prime,
        args.chrom_size,
        args.seed,
    );
    info!(
        "Sketching {} ({} bp) with the {} strategy (k = {}, prime = {}, seed = {}).",
        args.chrom,
        sketch_params.chrom_size(),
        sketch_params.strategy(),
        sketch_params.k(),
        sketch_params.prime(),
        sketch_params.seed()
    );

    let set_a = BedFile::new(&args.set_a);
    let set_b = BedFile::new(&args.set_b);
    let estimate = compare_sets(&set_a, &set_b, &args.chrom, &sketch_params)?;
    info!("Estimated Jaccard similarity: {:.4}", estimate);
    println!("{}", estimate);

    if let Some(out_dir) = &args.out_dir {
        let out_file = File::create(out_dir.join("jaccard.tsv"))?;
        let mut writer = BufWriter::new(out_file);
        writeln!(writer, "set_a\tset_b\tchrom\tstrategy\tk\tjaccard")?;
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            set_a.path().display(),
            set_b.path().display(),
            args.chrom,
            sketch_params.strategy(),
            sketch_params.k(),
            estimate
        )?;
    }

    info!("Elapsed time (sec): {:.2}", start.elapsed().as_secs_f32());
    info!("Done.");

    Ok(())
}
