//! Read depth tables.
//!
//! Two layouts are read:
//!
//! * per transcript, `name\td1\td2...`, one depth per transcript base
//! * per genomic position, `chrom\tpos\tdepth` as written by `samtools depth`, 1-based

use crate::libs::error::FormatError;
use crate::libs::gtf::Transcript;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

fn parse_u32(value: &str, field: &'static str, line: usize) -> Result<u32, FormatError> {
    value.parse::<u32>().map_err(|_| FormatError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

/// Parses a `name\td1\td2...` row
pub fn parse_depth_row(line: &str, line_no: usize) -> Result<(String, Vec<u32>), FormatError> {
    let mut fields = line.trim_end().split('\t');
    let name = match fields.next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(FormatError::FieldCount {
                line: line_no,
                expected: 1,
                found: 0,
            })
        }
    };
    let depths = fields
        .map(|e| parse_u32(e, "depth", line_no))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((name, depths))
}

/// Reads per-transcript depths, keeping only `wanted` names when given.
pub fn read_depth_table<R: BufRead>(
    reader: R,
    wanted: Option<&IndexSet<String>>,
) -> anyhow::Result<IndexMap<String, Vec<u32>>> {
    let mut table = IndexMap::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (name, depths) = parse_depth_row(&line, i + 1)?;
        if wanted.is_some_and(|w| !w.contains(&name)) {
            continue;
        }
        table.insert(name, depths);
    }
    Ok(table)
}

/// `None` for a row without depths
///
/// ```
/// # use seqcov::libs::depth::mean_depth;
/// assert_eq!(mean_depth(&[1, 2, 3, 6]), Some(3.0));
/// assert_eq!(mean_depth(&[]), None);
/// ```
pub fn mean_depth(depths: &[u32]) -> Option<f64> {
    if depths.is_empty() {
        return None;
    }
    let sum: u64 = depths.iter().map(|&d| d as u64).sum();
    Some(sum as f64 / depths.len() as f64)
}

/// 0-based exon positions of the transcripts, by sequence
pub fn wanted_positions<'a, I>(transcripts: I) -> HashMap<String, HashSet<u64>>
where
    I: IntoIterator<Item = &'a Transcript>,
{
    let mut wanted: HashMap<String, HashSet<u64>> = HashMap::new();
    for transcript in transcripts {
        wanted
            .entry(transcript.seq.clone())
            .or_default()
            .extend(transcript.positions());
    }
    wanted
}

/// Genomic depths of the positions somebody asked for
#[derive(Debug, Default)]
pub struct PositionDepths {
    by_seq: HashMap<String, HashMap<u64, u32>>,
}

impl PositionDepths {
    /// Reads `samtools depth` rows, keeping the `wanted` 0-based positions only.
    pub fn read<R: BufRead>(
        reader: R,
        wanted: &HashMap<String, HashSet<u64>>,
    ) -> anyhow::Result<Self> {
        let mut depths = Self::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 {
                return Err(FormatError::FieldCount {
                    line: i + 1,
                    expected: 3,
                    found: fields.len(),
                }
                .into());
            }

            let Some(positions) = wanted.get(fields[0]) else {
                continue;
            };
            let pos = parse_u32(fields[1], "position", i + 1)? as u64;
            if pos == 0 {
                return Err(FormatError::InvalidField {
                    line: i + 1,
                    field: "position",
                    value: fields[1].to_string(),
                }
                .into());
            }
            if !positions.contains(&(pos - 1)) {
                continue;
            }
            let depth = parse_u32(fields[2], "depth", i + 1)?;
            depths
                .by_seq
                .entry(fields[0].to_string())
                .or_default()
                .insert(pos - 1, depth);
        }
        Ok(depths)
    }

    /// Depth at a 0-based position, zero when absent
    pub fn get(&self, seq: &str, pos: u64) -> u32 {
        self.by_seq
            .get(seq)
            .and_then(|e| e.get(&pos))
            .copied()
            .unwrap_or(0)
    }

    /// Depths along the transcript, 5' to 3'
    pub fn project(&self, transcript: &Transcript) -> Vec<u32> {
        transcript
            .positions()
            .into_iter()
            .map(|pos| self.get(&transcript.seq, pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::interval::Interval;

    #[test]
    fn test_depth_table() {
        let input = "T1\t1\t2\t3\nT2\t0\t0\n\nT3\t5\n";
        let table = read_depth_table(input.as_bytes(), None).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table["T1"], vec![1, 2, 3]);

        let wanted: IndexSet<String> = ["T3".to_string()].into_iter().collect();
        let table = read_depth_table(input.as_bytes(), Some(&wanted)).unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["T3"]);
    }

    #[test]
    fn test_bad_depth() {
        let input = "T1\t1\t2\nT2\t1\tx\n";
        let err = read_depth_table(input.as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("line 2: invalid depth"));
    }

    #[test]
    fn test_project_transcripts() {
        let mut plus = Transcript::new("T1", "chr1", '+');
        plus.add_exon(Interval::new("chr1", 0, 3).unwrap());
        plus.add_exon(Interval::new("chr1", 10, 12).unwrap());
        let mut minus = Transcript::new("T2", "chr2", '-');
        minus.add_exon(Interval::new("chr2", 0, 2).unwrap());
        minus.add_exon(Interval::new("chr2", 5, 7).unwrap());

        let wanted = wanted_positions([&plus, &minus]);
        assert_eq!(wanted["chr1"].len(), 5);

        // 1-based positions; chr1:2 and chr2:7 have no row
        let samtools = "\
chr1\t1\t10
chr1\t3\t30
chr1\t4\t99
chr1\t11\t110
chr1\t12\t120
chr2\t1\t1
chr2\t2\t2
chr2\t6\t6
chr3\t1\t1
";
        let depths = PositionDepths::read(samtools.as_bytes(), &wanted).unwrap();
        assert_eq!(depths.get("chr1", 3), 0);
        assert_eq!(depths.project(&plus), vec![10, 0, 30, 110, 120]);
        assert_eq!(depths.project(&minus), vec![0, 6, 2, 1]);
    }

    #[test]
    fn test_position_zero() {
        let mut t = Transcript::new("T1", "chr1", '+');
        t.add_exon(Interval::new("chr1", 0, 3).unwrap());
        let wanted = wanted_positions([&t]);
        assert!(PositionDepths::read("chr1\t0\t5\n".as_bytes(), &wanted).is_err());
    }
}
