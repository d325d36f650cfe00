use std::path::PathBuf;

use pileup_sites::prelude::*;
use polars::prelude::*;
use rstest::{
    fixture,
    rstest,
};
use tempfile::TempDir;

mod common;
use common::{
    i64_column,
    write_pileup,
};

struct Inputs {
    // Keeps the files alive
    _dir:  TempDir,
    paths: Vec<PathBuf>,
}

#[fixture]
fn inputs() -> Inputs {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_pileup(dir.path(), "S1.unfiltered.uniq.tsv", &[
            (("chr1", 100, "+"), (30, 6)),
            (("chr1", 200, "-"), (10, 0)),
        ]),
        write_pileup(dir.path(), "S1.unfiltered.multi.tsv", &[
            (("chr1", 100, "+"), (2, 1)),
        ]),
        write_pileup(dir.path(), "S1.filtered.uniq.tsv", &[
            (("chr1", 100, "+"), (25, 5)),
            (("chr2", 5, "+"), (3, 3)),
        ]),
        write_pileup(dir.path(), "S1.filtered.multi.tsv", &[]),
    ];
    Inputs { _dir: dir, paths }
}

#[rstest]
fn test_combine_union_and_zero_fill(inputs: Inputs) -> anyhow::Result<()> {
    let df = PileupCombiner::new().combine(&inputs.paths)?;

    let mut expected_names = vec!["ref", "pos", "strand"];
    let count_names = CountColumn::combined()
        .iter()
        .map(CountColumn::name)
        .collect::<Vec<_>>();
    expected_names.extend(count_names.iter().map(String::as_str));
    assert_eq!(df.get_column_names_str(), expected_names);

    assert_eq!(df.height(), 3);
    for name in count_names.iter() {
        assert_eq!(df.column(name)?.null_count(), 0, "nulls in {}", name);
    }

    let keys = SiteKey::from_df(&df)?;
    assert_eq!(keys, vec![
        SiteKey::new("chr1", 100, Strand::Forward),
        SiteKey::new("chr1", 200, Strand::Reverse),
        SiteKey::new("chr2", 5, Strand::Forward),
    ]);

    assert_eq!(
        i64_column(&df, "convertedBaseCount_unfiltered_uniq"),
        vec![Some(30), Some(10), Some(0)]
    );
    assert_eq!(
        i64_column(&df, "unconvertedBaseCount_unfiltered_multi"),
        vec![Some(1), Some(0), Some(0)]
    );
    assert_eq!(
        i64_column(&df, "unconvertedBaseCount_filtered_uniq"),
        vec![Some(5), Some(0), Some(3)]
    );
    assert_eq!(
        i64_column(&df, "convertedBaseCount_filtered_multi"),
        vec![Some(0), Some(0), Some(0)]
    );
    Ok(())
}

#[rstest]
fn test_join_strategies_agree(inputs: Inputs) -> anyhow::Result<()> {
    let tree = PileupCombiner::new()
        .with_strategy(JoinStrategy::Tree)
        .combine(&inputs.paths)?;
    let sequential = PileupCombiner::new()
        .with_strategy(JoinStrategy::Sequential)
        .combine(&inputs.paths)?;
    assert!(tree.equals_missing(&sequential));
    Ok(())
}

#[test]
fn test_disjoint_keys() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = vec![
        write_pileup(dir.path(), "uu.tsv", &[(("A", 1, "+"), (4, 1))]),
        write_pileup(dir.path(), "um.tsv", &[]),
        write_pileup(dir.path(), "fu.tsv", &[(("B", 2, "-"), (7, 2))]),
        write_pileup(dir.path(), "fm.tsv", &[]),
    ];
    let df = PileupCombiner::new().combine(&paths)?;

    assert_eq!(df.height(), 2);
    assert_eq!(
        i64_column(&df, "convertedBaseCount_unfiltered_uniq"),
        vec![Some(4), Some(0)]
    );
    assert_eq!(
        i64_column(&df, "convertedBaseCount_filtered_uniq"),
        vec![Some(0), Some(7)]
    );
    Ok(())
}

#[rstest]
#[case::three(3)]
#[case::five(5)]
fn test_wrong_input_count(
    inputs: Inputs,
    #[case] n: usize,
) {
    let paths = inputs
        .paths
        .iter()
        .cycle()
        .take(n)
        .cloned()
        .collect::<Vec<_>>();
    assert!(matches!(
        PileupCombiner::new().combine(&paths),
        Err(PileupError::Argument(_))
    ));
}

#[rstest]
fn test_missing_input(inputs: Inputs) {
    let mut paths = inputs.paths.clone();
    paths[2] = inputs._dir.path().join("absent.tsv");
    assert!(matches!(
        PileupCombiner::new().combine(&paths),
        Err(PileupError::Io { .. })
    ));
}

#[rstest]
fn test_write_read_back(inputs: Inputs) -> anyhow::Result<()> {
    let mut df = PileupCombiner::new().combine(&inputs.paths)?;
    let out = inputs._dir.path().join("S1_genome.arrow");
    write_combined(&mut df, &out, None)?;

    let read = IpcReader::new(std::fs::File::open(&out)?).finish()?;
    assert!(read.equals_missing(&df));
    Ok(())
}
