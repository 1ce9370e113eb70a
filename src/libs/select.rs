use crate::libs::coverage::CoverageArray;
use crate::libs::error::FormatError;
use crate::libs::last::AlignmentRecord;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Score desc, then query proportion desc, then subject proportion desc
fn rank(a: &AlignmentRecord, b: &AlignmentRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.query_proportion().total_cmp(&a.query_proportion()))
        .then_with(|| b.subject_proportion().total_cmp(&a.subject_proportion()))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStats {
    /// Distinct queries seen
    pub queries: usize,
    /// Queries with more than one alignment
    pub multi_hit_queries: usize,
    /// Records yielded
    pub selected: usize,
}

/// Groups records by query, keeping first-seen query order, and ranks every group.
fn ranked_groups<I>(records: I) -> IndexMap<String, Vec<AlignmentRecord>>
where
    I: IntoIterator<Item = AlignmentRecord>,
{
    let mut groups: IndexMap<String, Vec<AlignmentRecord>> = IndexMap::new();
    for record in records {
        groups.entry(record.query.clone()).or_default().push(record);
    }
    for group in groups.values_mut() {
        // sort_by is stable, so input order breaks the remaining ties
        group.sort_by(rank);
    }
    groups
}

fn select<I, F>(records: I, keep: F) -> (Vec<AlignmentRecord>, SelectionStats)
where
    I: IntoIterator<Item = AlignmentRecord>,
    F: Fn(&AlignmentRecord, &AlignmentRecord) -> bool,
{
    let groups = ranked_groups(records);

    let mut stats = SelectionStats {
        queries: groups.len(),
        ..Default::default()
    };
    let mut selected = vec![];
    for (_, group) in groups {
        if group.len() > 1 {
            stats.multi_hit_queries += 1;
        }
        let top = group[0].clone();
        selected.extend(group.into_iter().filter(|e| keep(&top, e)));
    }
    stats.selected = selected.len();

    (selected, stats)
}

/// Records keyed by subject, in first-seen order.
pub fn group_by_subject<I>(records: I) -> IndexMap<String, Vec<AlignmentRecord>>
where
    I: IntoIterator<Item = AlignmentRecord>,
{
    let mut groups: IndexMap<String, Vec<AlignmentRecord>> = IndexMap::new();
    for record in records {
        groups.entry(record.subject.clone()).or_default().push(record);
    }
    groups
}

/// Every record sharing the top score of its query, best ranked first.
pub fn best_per_query<I>(records: I) -> Vec<AlignmentRecord>
where
    I: IntoIterator<Item = AlignmentRecord>,
{
    best_with_stats(records).0
}

pub fn best_with_stats<I>(records: I) -> (Vec<AlignmentRecord>, SelectionStats)
where
    I: IntoIterator<Item = AlignmentRecord>,
{
    select(records, |top, e| e.score == top.score)
}

/// Only the records equal to the top of their query on all three ranking keys.
pub fn representative_per_query<I>(records: I) -> Vec<AlignmentRecord>
where
    I: IntoIterator<Item = AlignmentRecord>,
{
    representative_with_stats(records).0
}

pub fn representative_with_stats<I>(records: I) -> (Vec<AlignmentRecord>, SelectionStats)
where
    I: IntoIterator<Item = AlignmentRecord>,
{
    select(records, |top, e| rank(top, e) == Ordering::Equal)
}

/// Minimal aligned proportions of a complete alignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub query: f64,
    pub subject: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            query: 0.95,
            subject: 0.95,
        }
    }
}

impl Thresholds {
    /// ```
    /// # use seqcov::libs::select::Thresholds;
    /// # use seqcov::libs::last::LastReader;
    /// let maf = "a score=5 EG2=1 E=1\ns tx 0 19 + 20 AAAAAAAAAAAAAAAAAAA\ns q 0 19 + 19 AAAAAAAAAAAAAAAAAAA\n";
    /// let record = LastReader::new(maf.as_bytes()).next().unwrap().unwrap();
    /// assert!(Thresholds::default().is_complete(&record));
    /// assert!(!Thresholds { query: 1.0, subject: 1.0 }.is_complete(&record));
    /// ```
    pub fn is_complete(&self, record: &AlignmentRecord) -> bool {
        record.query_proportion() >= self.query && record.subject_proportion() >= self.subject
    }
}

/// Selected alignments of one LAST run, organised by subject.
#[derive(Debug, Default)]
pub struct TranscriptAnalysis {
    covered: IndexMap<String, Vec<AlignmentRecord>>,
    complete: IndexMap<String, Vec<AlignmentRecord>>,
    coverage: IndexMap<String, CoverageArray>,
    query_counts: IndexMap<String, usize>,
}

impl TranscriptAnalysis {
    /// `records` are expected to be selected already, see [`best_per_query`].
    pub fn new<I>(records: I, thresholds: &Thresholds) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = AlignmentRecord>,
    {
        let mut analysis = Self::default();

        for record in records {
            if thresholds.is_complete(&record) {
                *analysis.query_counts.entry(record.query.clone()).or_default() += 1;
                analysis
                    .complete
                    .entry(record.subject.clone())
                    .or_default()
                    .push(record.clone());
            }

            analysis
                .coverage
                .entry(record.subject.clone())
                .or_insert_with(|| CoverageArray::new(record.subject_length))
                .add(&record)?;

            analysis
                .covered
                .entry(record.subject.clone())
                .or_default()
                .push(record);
        }

        Ok(analysis)
    }

    /// Subjects with at least one alignment
    pub fn covered_subjects(&self) -> impl Iterator<Item = &str> {
        self.covered.keys().map(|e| e.as_str())
    }

    /// Subjects with at least one complete alignment
    pub fn complete_subjects(&self) -> impl Iterator<Item = &str> {
        self.complete.keys().map(|e| e.as_str())
    }

    /// A query is unambiguous when exactly one complete alignment exists for it.
    pub fn is_unambiguous(&self, query: &str) -> bool {
        self.query_counts.get(query).copied() == Some(1)
    }

    /// Subjects completely covered by an unambiguous query
    pub fn unambiguous_subjects(&self) -> Vec<&str> {
        self.complete
            .iter()
            .filter(|(_, records)| records.iter().any(|e| self.is_unambiguous(&e.query)))
            .map(|(subject, _)| subject.as_str())
            .collect()
    }

    pub fn alignments(&self, subject: &str) -> &[AlignmentRecord] {
        self.covered.get(subject).map(|e| e.as_slice()).unwrap_or(&[])
    }

    pub fn complete_alignments(&self, subject: &str) -> &[AlignmentRecord] {
        self.complete.get(subject).map(|e| e.as_slice()).unwrap_or(&[])
    }

    pub fn coverage(&self, subject: &str) -> Option<&CoverageArray> {
        self.coverage.get(subject)
    }

    pub fn complete_count(&self, query: &str) -> usize {
        self.query_counts.get(query).copied().unwrap_or(0)
    }
}
