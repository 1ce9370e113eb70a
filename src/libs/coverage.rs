use crate::libs::error::FormatError;
use crate::libs::last::AlignmentRecord;
use indexmap::IndexMap;
use std::ops::Range;

/// Per-base alignment depth of one subject sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageArray(Vec<u32>);

/// Subject bases consumed by walking the alignment columns
fn subject_span(record: &AlignmentRecord) -> usize {
    record
        .query_align_string
        .bytes()
        .zip(record.subject_align_string.bytes())
        .filter(|&(q, s)| q == b'-' || s != b'-')
        .count()
}

impl CoverageArray {
    pub fn new(length: usize) -> Self {
        Self(vec![0; length])
    }

    /// A fresh array of `length` bases with every record added.
    pub fn build<'a, I>(length: usize, records: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = &'a AlignmentRecord>,
    {
        let mut coverage = Self::new(length);
        for record in records {
            coverage.add(record)?;
        }
        Ok(coverage)
    }

    /// Walks the aligned strings from the subject start.
    ///
    /// A gap in the query skips the subject base without covering it, a gap in the subject is
    /// an insertion and doesn't move along the subject.
    ///
    /// ```
    /// # use seqcov::libs::coverage::CoverageArray;
    /// # use seqcov::libs::last::LastReader;
    /// let maf = "a score=5 EG2=1 E=1\ns tx 1 5 + 8 AC-GTA\ns q 0 5 + 5 A-TGTA\n";
    /// let record = LastReader::new(maf.as_bytes()).next().unwrap().unwrap();
    /// let mut coverage = CoverageArray::new(8);
    /// coverage.add(&record).unwrap();
    /// assert_eq!(coverage.depths(), &[0, 1, 0, 1, 1, 1, 0, 0]);
    /// ```
    pub fn add(&mut self, record: &AlignmentRecord) -> Result<(), FormatError> {
        if record.subject_start + subject_span(record) > self.0.len() {
            return Err(FormatError::OutOfBounds {
                subject: record.subject.clone(),
                query: record.query.clone(),
                length: self.0.len(),
            });
        }

        let mut idx = record.subject_start;
        for (q, s) in record
            .query_align_string
            .bytes()
            .zip(record.subject_align_string.bytes())
        {
            if q == b'-' {
                idx += 1;
            } else if s == b'-' {
                continue;
            } else {
                self.0[idx] += 1;
                idx += 1;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depths(&self) -> &[u32] {
        &self.0
    }

    /// Bases with a positive depth
    pub fn covered_bases(&self) -> usize {
        self.0.iter().filter(|&&d| d > 0).count()
    }

    /// Maximal runs of uncovered bases
    pub fn gap_ranges(&self) -> Vec<Range<usize>> {
        runs(self.0.len(), |i| self.0[i] == 0)
    }

    /// Maximal runs of covered bases
    pub fn covered_ranges(&self) -> Vec<Range<usize>> {
        runs(self.0.len(), |i| self.0[i] > 0)
    }

    /// Slices of `seq` not covered by any alignment, left to right
    pub fn gaps<'s>(&self, seq: &'s [u8]) -> Vec<&'s [u8]> {
        slices(seq, self.gap_ranges())
    }

    /// Slices of `seq` covered by at least one alignment, left to right
    pub fn covered<'s>(&self, seq: &'s [u8]) -> Vec<&'s [u8]> {
        slices(seq, self.covered_ranges())
    }
}

/// One array per subject, sized by the subject length of its first record.
pub fn coverage_by_subject<I>(records: I) -> Result<IndexMap<String, CoverageArray>, FormatError>
where
    I: IntoIterator<Item = AlignmentRecord>,
{
    let mut by_subject: IndexMap<String, CoverageArray> = IndexMap::new();
    for record in records {
        by_subject
            .entry(record.subject.clone())
            .or_insert_with(|| CoverageArray::new(record.subject_length))
            .add(&record)?;
    }
    Ok(by_subject)
}

/// Runs where neither the alignments nor the reads cover a base. Missing read depths count as
/// zero.
pub fn low_coverage_gaps(coverage: &CoverageArray, read_depth: &[u32]) -> Vec<Range<usize>> {
    runs(coverage.len(), |i| {
        coverage.0[i] == 0 && read_depth.get(i).copied().unwrap_or(0) == 0
    })
}

/// Bases of a transcript no alignment reaches, and how many of them reads barely touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingBases {
    pub length: usize,
    /// Bases with no alignment
    pub missing: usize,
    /// `missing` bases with read depth 1 or less
    pub low_read_depth: usize,
}

/// A transcript without read depths has every missing base in `low_read_depth`.
///
/// ```
/// # use seqcov::libs::coverage::{missing_bases, CoverageArray, MissingBases};
/// let coverage = CoverageArray::new(6);
/// let stats = missing_bases(&coverage, Some(&[0, 1, 2, 5][..]));
/// assert_eq!(stats, MissingBases { length: 6, missing: 6, low_read_depth: 4 });
/// assert_eq!(missing_bases(&coverage, None).low_read_depth, 6);
/// ```
pub fn missing_bases(coverage: &CoverageArray, read_depth: Option<&[u32]>) -> MissingBases {
    let mut stats = MissingBases {
        length: coverage.len(),
        ..Default::default()
    };
    for (i, &depth) in coverage.depths().iter().enumerate() {
        if depth > 0 {
            continue;
        }
        stats.missing += 1;
        let reads = read_depth.map_or(0, |e| e.get(i).copied().unwrap_or(0));
        if reads <= 1 {
            stats.low_read_depth += 1;
        }
    }
    stats
}

fn slices(seq: &[u8], ranges: Vec<Range<usize>>) -> Vec<&[u8]> {
    ranges
        .into_iter()
        .filter_map(|r| seq.get(r.start..r.end.min(seq.len())))
        .filter(|e| !e.is_empty())
        .collect()
}

fn runs<F>(length: usize, inside: F) -> Vec<Range<usize>>
where
    F: Fn(usize) -> bool,
{
    let mut ranges = vec![];
    let mut start: Option<usize> = None;
    for i in 0..length {
        match (start, inside(i)) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                ranges.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    // trailing run
    if let Some(s) = start {
        ranges.push(s..length);
    }
    ranges
}
