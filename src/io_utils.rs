use std::path::Path;

const INTERVAL_EXTENSIONS: [&str; 5] = [".bed", ".narrowPeak", ".broadPeak", ".bedGraph", ".txt"];

/// Extracts an interval set identifier from a file path by removing common file extensions.
pub fn set_id_from_filename(interval_file: &Path) -> String {
    let file_name = match interval_file.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return interval_file.display().to_string(),
    };

    for ext in INTERVAL_EXTENSIONS {
        if let Some(stem) = file_name.strip_suffix(ext) {
            return stem.to_string();
        }
    }

    file_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_set_id_from_filename() {
        assert_eq!(set_id_from_filename(&PathBuf::from("/data/ENCFF592UJG.bed")), "ENCFF592UJG");
        assert_eq!(set_id_from_filename(&PathBuf::from("peaks.narrowPeak")), "peaks");
        assert_eq!(set_id_from_filename(&PathBuf::from("a.bed.bed")), "a.bed");
        assert_eq!(set_id_from_filename(&PathBuf::from("intervals.tsv")), "intervals.tsv");
    }
}
