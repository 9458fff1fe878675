//! Sources of sorted genomic intervals.
//!
//! The sketching pipeline only needs, for a named chromosome, the `[start, end)` intervals
//! of a set in start order. `BedFile` supplies them from a plain-text BED file. Records
//! are returned in file order; sortedness is checked later by the compactor and never
//! repaired here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::error::SketchError;
use crate::interval::{Interval, Position};
use crate::io_utils::set_id_from_filename;

/// Provides the intervals of one set for a requested chromosome.
pub trait IntervalProvider {
    /// Human-readable name of the set, used in logs and error messages.
    fn name(&self) -> String;

    fn intervals(&self, chrom: &str) -> Result<Vec<Interval>>;
}

#[derive(Clone, Debug)]
pub struct BedFile {
    path: PathBuf,
}

impl BedFile {
    pub fn new(path: &Path) -> Self {
        BedFile {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IntervalProvider for BedFile {
    fn name(&self) -> String {
        set_id_from_filename(&self.path)
    }

    fn intervals(&self, chrom: &str) -> Result<Vec<Interval>> {
        let file = File::open(&self.path)
            .context(format!("Failed to open {}", self.path.display()))?;
        let reader = BufReader::new(file);

        let mut intervals = Vec::new();
        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();

            // skip headers and comments
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with("track")
                || line.starts_with("browser")
            {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                bail!(
                    "Invalid BED record on line {} of {}: expected at least 3 columns (chrom, start, end)",
                    line_idx + 1,
                    self.path.display()
                );
            }

            if fields[0] != chrom {
                continue;
            }

            let start: Position = fields[1].parse().context(format!(
                "Invalid start coordinate '{}' on line {} of {}",
                fields[1],
                line_idx + 1,
                self.path.display()
            ))?;
            let end: Position = fields[2].parse().context(format!(
                "Invalid end coordinate '{}' on line {} of {}",
                fields[2],
                line_idx + 1,
                self.path.display()
            ))?;

            intervals.push(Interval::new(start, end));
        }

        if intervals.is_empty() {
            return Err(SketchError::ChromNotFound {
                chrom: chrom.to_string(),
                source_name: self.path.display().to_string(),
            }
            .into());
        }

        Ok(intervals)
    }
}
