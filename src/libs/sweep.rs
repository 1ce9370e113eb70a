//! Multi-dataset coverage by sweeping interval boundaries.
//!
//! Each dataset records `+1` at the start and `-1` at the end of every interval. Walking the
//! union of all boundaries of a sequence from left to right, the running sums give the depth of
//! every dataset, constant between two consecutive boundaries. Intervals sharing a start or end
//! collapse into one delta, so overlaps never have to be computed pairwise.
//!
//! ```
//! use seqcov::libs::interval::Interval;
//! use seqcov::libs::sweep::{accumulate, Dataset};
//!
//! let mut exons = Dataset::new("exons");
//! exons.add(&Interval::new("chr1", 0, 10).unwrap());
//! exons.mark_end("chr1", 20);
//! let mut reads = Dataset::new("reads");
//! reads.add(&Interval::new("chr1", 5, 15).unwrap());
//!
//! let totals = accumulate(&[exons, reads]);
//! assert_eq!(totals.span("chr1"), 20);
//! assert_eq!(totals.covered(0), 10);
//! assert_eq!(totals.overlap(0, 1), 5);
//! ```

use crate::libs::interval::{Interval, IntervalSource};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

//----------------------------
// Dataset
//----------------------------
/// Boundary deltas of one named input, keyed by sequence then position.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    name: String,
    deltas: BTreeMap<String, BTreeMap<u64, i64>>,
}

impl Dataset {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            deltas: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, interval: &Interval) {
        let seq = self.deltas.entry(interval.seq().to_string()).or_default();
        *seq.entry(interval.start()).or_insert(0) += 1;
        *seq.entry(interval.end()).or_insert(0) -= 1;
    }

    pub fn extend<S: IntervalSource + ?Sized>(&mut self, source: &S) {
        for interval in source.intervals() {
            self.add(&interval);
        }
    }

    /// Records a zero delta at the known length of `seq`, so the observed span reaches the real
    /// end of the sequence instead of the last interval end.
    pub fn mark_end(&mut self, seq: &str, length: u64) {
        self.deltas
            .entry(seq.to_string())
            .or_default()
            .entry(length)
            .or_insert(0);
    }

    pub fn seqs(&self) -> impl Iterator<Item = &str> {
        self.deltas.keys().map(|e| e.as_str())
    }

    fn breakpoints(&self, seq: &str) -> Option<&BTreeMap<u64, i64>> {
        self.deltas.get(seq)
    }

    fn delta_at(&self, seq: &str, pos: u64) -> i64 {
        self.deltas
            .get(seq)
            .and_then(|e| e.get(&pos))
            .copied()
            .unwrap_or(0)
    }
}

//----------------------------
// Pattern
//----------------------------
/// Which datasets cover a position, one bit per dataset in input order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(Vec<bool>);

impl Pattern {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// `X` marks a covering dataset, anything else an uncovered one.
    ///
    /// ```
    /// # use seqcov::libs::sweep::Pattern;
    /// let p = Pattern::from_marks("X-X");
    /// assert!(p.is_set(0) && !p.is_set(1) && p.is_set(2));
    /// assert_eq!(p.to_string(), "X-X");
    /// ```
    pub fn from_marks(marks: &str) -> Self {
        Self(marks.chars().map(|c| c == 'X').collect())
    }

    fn from_depths(depths: &[i64]) -> Self {
        Self(depths.iter().map(|&d| d > 0).collect())
    }

    pub fn is_set(&self, idx: usize) -> bool {
        self.0.get(idx).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            write!(f, "{}", if bit { 'X' } else { '-' })?;
        }
        Ok(())
    }
}

//----------------------------
// SweepTotals
//----------------------------
/// Bases per coverage pattern, for every sequence seen in any dataset.
#[derive(Debug, Clone, Default)]
pub struct SweepTotals {
    dataset_cnt: usize,
    by_seq: BTreeMap<String, HashMap<Pattern, u64>>,
}

impl SweepTotals {
    pub fn dataset_count(&self) -> usize {
        self.dataset_cnt
    }

    pub fn seqs(&self) -> impl Iterator<Item = &str> {
        self.by_seq.keys().map(|e| e.as_str())
    }

    pub fn patterns(&self, seq: &str) -> Option<&HashMap<Pattern, u64>> {
        self.by_seq.get(seq)
    }

    /// Bases of `seq` having exactly `pattern`
    pub fn count(&self, seq: &str, pattern: &Pattern) -> u64 {
        self.by_seq
            .get(seq)
            .and_then(|e| e.get(pattern))
            .copied()
            .unwrap_or(0)
    }

    /// Length of `[0, last boundary)` of `seq`
    pub fn span(&self, seq: &str) -> u64 {
        self.by_seq.get(seq).map(|e| e.values().sum()).unwrap_or(0)
    }

    /// Sum of the observed spans of all sequences
    pub fn genome(&self) -> u64 {
        self.by_seq.values().flat_map(|e| e.values()).sum()
    }

    /// Pattern totals over all sequences
    pub fn merged(&self) -> BTreeMap<Pattern, u64> {
        let mut merged = BTreeMap::new();
        for (pattern, cnt) in self.by_seq.values().flatten() {
            *merged.entry(pattern.clone()).or_insert(0) += cnt;
        }
        merged
    }

    /// Bases, over all sequences, whose pattern satisfies `predicate`
    pub fn count_where<F>(&self, predicate: F) -> u64
    where
        F: Fn(&Pattern) -> bool,
    {
        self.by_seq
            .values()
            .flatten()
            .filter(|(pattern, _)| predicate(pattern))
            .map(|(_, cnt)| cnt)
            .sum()
    }

    pub fn covered(&self, idx: usize) -> u64 {
        self.count_where(|p| p.is_set(idx))
    }

    pub fn overlap(&self, idx: usize, other: usize) -> u64 {
        self.count_where(|p| p.is_set(idx) && p.is_set(other))
    }
}

/// Sweeps every sequence of every dataset and tallies the bases per coverage pattern.
pub fn accumulate(datasets: &[Dataset]) -> SweepTotals {
    let seqs: BTreeSet<&str> = datasets.iter().flat_map(|e| e.seqs()).collect();

    let mut totals = SweepTotals {
        dataset_cnt: datasets.len(),
        by_seq: BTreeMap::new(),
    };

    for seq in seqs {
        let sites: BTreeSet<u64> = datasets
            .iter()
            .filter_map(|e| e.breakpoints(seq))
            .flat_map(|e| e.keys().copied())
            .collect();

        let mut depths = vec![0i64; datasets.len()];
        let mut prev = 0u64;
        let counts = totals.by_seq.entry(seq.to_string()).or_default();

        for pos in sites {
            // depths hold for [prev, pos)
            if pos > prev {
                *counts.entry(Pattern::from_depths(&depths)).or_insert(0) += pos - prev;
            }
            for (depth, dataset) in depths.iter_mut().zip(datasets) {
                *depth += dataset.delta_at(seq, pos);
            }
            prev = pos;
        }
    }

    totals
}

//----------------------------
// Reductions
//----------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceSummary {
    /// Observed span summed over sequences
    pub genome: u64,
    /// Bases in at least one interval
    pub covered: u64,
}

impl ReferenceSummary {
    pub fn of(dataset: &Dataset) -> Self {
        let totals = accumulate(std::slice::from_ref(dataset));
        Self {
            genome: totals.genome(),
            covered: totals.covered(0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub name: String,
    /// Bases covered by this dataset
    pub genome_total: u64,
    /// Bases covered by this dataset and the reference
    pub exome_total: u64,
    /// `genome_total` also covered by the special dataset
    pub genome_overlap: Option<u64>,
    /// `exome_total` also covered by the special dataset
    pub exome_overlap: Option<u64>,
}

/// One summary per dataset other than `reference`, in input order.
pub fn summarize(
    datasets: &[Dataset],
    totals: &SweepTotals,
    reference: usize,
    special: Option<usize>,
) -> Vec<DatasetSummary> {
    datasets
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != reference)
        .map(|(i, dataset)| DatasetSummary {
            name: dataset.name().to_string(),
            genome_total: totals.covered(i),
            exome_total: totals.overlap(i, reference),
            genome_overlap: special.map(|s| totals.overlap(i, s)),
            exome_overlap: special
                .map(|s| totals.count_where(|p| p.is_set(i) && p.is_set(reference) && p.is_set(s))),
        })
        .collect()
}

/// Maximal runs where at least `min_depth` intervals are stacked.
///
/// ```
/// # use seqcov::libs::interval::Interval;
/// # use seqcov::libs::sweep::depth_runs;
/// let exons = vec![
///     Interval::new("chr1", 0, 10).unwrap(),
///     Interval::new("chr1", 5, 20).unwrap(),
///     Interval::new("chr1", 30, 40).unwrap(),
/// ];
/// let runs = depth_runs(&exons, 2);
/// assert_eq!(runs, vec![Interval::new("chr1", 5, 10).unwrap()]);
/// ```
pub fn depth_runs(intervals: &[Interval], min_depth: i64) -> Vec<Interval> {
    let mut dataset = Dataset::new("runs");
    dataset.extend(intervals);

    let mut runs = vec![];
    for (seq, sites) in &dataset.deltas {
        let mut depth = 0i64;
        let mut open: Option<u64> = None;
        for (&pos, &delta) in sites {
            depth += delta;
            match (open, depth >= min_depth) {
                (None, true) => open = Some(pos),
                (Some(start), false) => {
                    if let Ok(run) = Interval::new(seq, start, pos) {
                        runs.push(run);
                    }
                    open = None;
                }
                _ => {}
            }
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(seq: &str, start: u64, end: u64) -> Interval {
        Interval::new(seq, start, end).unwrap()
    }

    fn dataset(name: &str, intervals: &[Interval]) -> Dataset {
        let mut ds = Dataset::new(name);
        ds.extend(intervals);
        ds
    }

    #[test]
    fn test_exome_genome_scenario() {
        let mut reference = dataset("ref", &[iv("chr1", 0, 10)]);
        reference.mark_end("chr1", 20);
        let ds1 = dataset("ds1", &[iv("chr1", 5, 15)]);

        let totals = accumulate(&[reference, ds1]);

        // [0,5) X- ; [5,10) XX ; [10,15) -X ; [15,20) --
        assert_eq!(totals.patterns("chr1").unwrap().len(), 4);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("X-")), 5);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("XX")), 5);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("-X")), 5);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("--")), 5);
        assert_eq!(totals.span("chr1"), 20);
        assert_eq!(totals.covered(0), 10);
        assert_eq!(totals.covered(1), 10);
        assert_eq!(totals.overlap(0, 1), 5);
    }

    #[test]
    fn test_leading_span_is_uncovered() {
        let mut marker = Dataset::new("marker");
        marker.mark_end("chr1", 20);
        let ds1 = dataset("ds1", &[iv("chr1", 5, 15)]);

        let totals = accumulate(&[marker, ds1]);
        // [0,5) and [15,20)
        assert_eq!(totals.count("chr1", &Pattern::from_marks("--")), 10);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("-X")), 10);
    }

    #[test]
    fn test_conservation() {
        let a = dataset(
            "a",
            &[iv("chr1", 3, 8), iv("chr1", 5, 12), iv("chr1", 5, 6), iv("chr2", 0, 4)],
        );
        let b = dataset("b", &[iv("chr1", 0, 2), iv("chr1", 11, 30)]);
        let mut c = dataset("c", &[iv("chr2", 2, 9)]);
        c.mark_end("chr2", 50);

        let totals = accumulate(&[a, b, c]);
        assert_eq!(totals.span("chr1"), 30);
        assert_eq!(totals.span("chr2"), 50);
        assert_eq!(totals.genome(), 80);
        let merged: u64 = totals.merged().values().sum();
        assert_eq!(merged, 80);
    }

    #[test]
    fn test_single_dataset_degenerates() {
        let mut a = dataset("a", &[iv("chr1", 2, 6), iv("chr1", 4, 9), iv("chr1", 12, 14)]);
        a.mark_end("chr1", 20);

        let totals = accumulate(&[a]);
        let patterns = totals.patterns("chr1").unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("X")), 9);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("-")), 11);
    }

    #[test]
    fn test_swap_relabels_bits() {
        let a = dataset("a", &[iv("chr1", 0, 10), iv("chr1", 20, 25)]);
        let b = dataset("b", &[iv("chr1", 5, 22)]);

        let ab = accumulate(&[a.clone(), b.clone()]);
        let ba = accumulate(&[b, a]);

        for (pattern, cnt) in ab.patterns("chr1").unwrap() {
            let swapped = Pattern::new(vec![pattern.is_set(1), pattern.is_set(0)]);
            assert_eq!(ba.count("chr1", &swapped), *cnt);
        }
        assert_eq!(ab.overlap(0, 1), ba.overlap(1, 0));
    }

    #[test]
    fn test_isolated_sequence() {
        let a = dataset("a", &[iv("chr1", 0, 10)]);
        let b = dataset("b", &[iv("chrM", 4, 6)]);

        let totals = accumulate(&[a, b]);
        assert_eq!(totals.count("chrM", &Pattern::from_marks("--")), 4);
        assert_eq!(totals.count("chrM", &Pattern::from_marks("-X")), 2);
        assert_eq!(totals.span("chrM"), 6);
    }

    #[test]
    fn test_empty_dataset_contributes_nothing() {
        let a = dataset("a", &[iv("chr1", 0, 10)]);
        let empty = Dataset::new("empty");

        let totals = accumulate(&[a, empty]);
        assert_eq!(totals.dataset_count(), 2);
        assert_eq!(totals.covered(1), 0);
        assert_eq!(totals.count("chr1", &Pattern::from_marks("X-")), 10);
    }

    #[test]
    fn test_shared_boundaries_collapse() {
        let a = dataset("a", &[iv("chr1", 0, 10), iv("chr1", 0, 10), iv("chr1", 10, 12)]);
        let totals = accumulate(&[a]);
        assert_eq!(totals.covered(0), 12);
        assert_eq!(totals.span("chr1"), 12);
    }

    #[test]
    fn test_reference_summary() {
        let mut exons = dataset("exons", &[iv("chr1", 0, 10), iv("chr1", 5, 12), iv("chr2", 0, 3)]);
        exons.mark_end("chr1", 100);
        let summary = ReferenceSummary::of(&exons);
        assert_eq!(summary.genome, 103);
        assert_eq!(summary.covered, 15);
    }

    #[test]
    fn test_summarize_with_special() {
        let exons = dataset("exons", &[iv("chr1", 0, 10)]);
        let a = dataset("a", &[iv("chr1", 0, 20)]);
        let special = dataset("special", &[iv("chr1", 5, 15)]);
        let datasets = vec![exons, a, special];

        let totals = accumulate(&datasets);
        let summaries = summarize(&datasets, &totals, 0, Some(2));

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "a");
        assert_eq!(summaries[0].genome_total, 20);
        assert_eq!(summaries[0].exome_total, 10);
        assert_eq!(summaries[0].genome_overlap, Some(10));
        assert_eq!(summaries[0].exome_overlap, Some(5));
        assert_eq!(summaries[1].genome_total, 10);
        assert_eq!(summaries[1].genome_overlap, Some(10));
    }

    #[test]
    fn test_depth_runs_merges_adjacent() {
        let exons = vec![iv("chr1", 0, 10), iv("chr1", 0, 5), iv("chr1", 5, 10), iv("chr2", 1, 2)];
        let runs = depth_runs(&exons, 2);
        assert_eq!(runs, vec![iv("chr1", 0, 10)]);
        assert!(depth_runs(&exons, 3).is_empty());
    }
}
