//! Helpers shared by the pipelines: the worker thread pool, sample id
//! derivation, builder macros and output file handling.

use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use log::debug;
use once_cell::sync::Lazy;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};
use tempfile::NamedTempFile;

use crate::error::{
    PileupError,
    Result,
};

/// Environment variable holding the number of worker threads.
pub const NUM_THREADS_ENV: &str = "PILEUP_NUM_THREADS";

/// Marker separating the sample id from the rest of a combined file name.
pub const SAMPLE_MARKER: &str = "_genome";

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var(NUM_THREADS_ENV)
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

/// Derives a sample id from a file path.
///
/// The id is the part of the file stem preceding [`SAMPLE_MARKER`], or the
/// whole stem when the marker is absent: `S1_genome.arrow` gives `S1`.
pub fn sample_id_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let sample = stem
        .split(SAMPLE_MARKER)
        .next()
        .unwrap_or_default()
        .to_string();

    if sample.is_empty() {
        return Err(PileupError::Argument(format!(
            "cannot derive sample id from {:?}",
            path
        )));
    }
    Ok(sample)
}

/// Fails with [`PileupError::Io`] if `path` is not an existing file.
pub fn validate_input<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PileupError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "input file does not exist",
            ),
        ));
    }
    Ok(path.to_path_buf())
}

/// Writes to a temporary file next to `path` and moves it into place
/// only if `write` succeeds.
pub fn write_atomic<P, F>(
    path: P,
    write: F,
) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> Result<()>, {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| PileupError::io(&dir, e))?;
    debug!("Writing {} through {}", path.display(), tmp.path().display());
    write(tmp.as_file_mut())?;
    tmp.persist(path)
        .map_err(|e| PileupError::io(path, e.error))?;
    Ok(())
}

/// Generates a builder-style `with_<field>` setter.
#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::arrow("data/S1_genome.arrow", "S1")]
    #[case::nested_marker("S2_genome_genome.arrow", "S2")]
    #[case::no_marker("sample.arrow", "sample")]
    #[case::underscore("liver_rep1_genome.filtered.arrow", "liver_rep1")]
    #[case::no_extension("S3_genome", "S3")]
    fn test_sample_id(
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(sample_id_from_path(path).unwrap(), expected);
    }

    #[test]
    fn test_sample_id_empty() {
        assert!(matches!(
            sample_id_from_path("_genome.arrow"),
            Err(PileupError::Argument(_))
        ));
    }

    #[test]
    fn test_validate_input_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.tsv");
        assert!(matches!(
            validate_input(&missing),
            Err(PileupError::Io { .. })
        ));
    }

    #[test]
    fn test_write_atomic_failure_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.tsv");

        let res = write_atomic(&target, |file| {
            file.write_all(b"partial").unwrap();
            Err(PileupError::Argument("boom".into()))
        });
        assert!(res.is_err());
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        write_atomic(&target, |file| {
            file.write_all(b"done").unwrap();
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "done");
    }
}
