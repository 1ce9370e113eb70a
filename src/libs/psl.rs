use crate::libs::error::FormatError;
use crate::libs::interval::{Interval, IntervalSource};
use indexmap::IndexMap;
use std::io::BufRead;

/// One row of a BLAT psLayout version 3 table.
#[derive(Debug, Clone, Default)]
pub struct Psl {
    pub match_count: u32,
    pub mismatch_count: u32,
    pub rep_match: u32,
    pub n_count: u32,
    pub q_num_insert: u32,
    pub q_base_insert: i32,
    pub t_num_insert: u32,
    pub t_base_insert: i32,
    pub strand: String, // "+", "-", "++", "+-"
    pub q_name: String,
    pub q_size: u32,
    pub q_start: i32,
    pub q_end: i32,
    pub t_name: String,
    pub t_size: u32,
    pub t_start: i32,
    pub t_end: i32,
    pub block_count: u32,
    pub block_sizes: Vec<u32>,
    pub q_starts: Vec<u32>,
    pub t_starts: Vec<u32>,
}

impl Psl {
    /// Parses a whitespace separated row. `line` is only used in error messages.
    pub fn parse_line(s: &str, line: usize) -> Result<Self, FormatError> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 21 {
            return Err(FormatError::FieldCount {
                line,
                expected: 21,
                found: fields.len(),
            });
        }

        let parse_u32 = |field: &'static str, v: &str| {
            v.parse::<u32>().map_err(|_| FormatError::InvalidField {
                line,
                field,
                value: v.to_string(),
            })
        };
        let parse_i32 = |field: &'static str, v: &str| {
            v.parse::<i32>().map_err(|_| FormatError::InvalidField {
                line,
                field,
                value: v.to_string(),
            })
        };
        let parse_vec = |field: &'static str, v: &str| -> Result<Vec<u32>, FormatError> {
            v.split(',')
                .filter(|e| !e.is_empty())
                .map(|e| parse_u32(field, e))
                .collect()
        };

        let psl = Psl {
            match_count: parse_u32("matches", fields[0])?,
            mismatch_count: parse_u32("misMatches", fields[1])?,
            rep_match: parse_u32("repMatches", fields[2])?,
            n_count: parse_u32("nCount", fields[3])?,
            q_num_insert: parse_u32("qNumInsert", fields[4])?,
            q_base_insert: parse_i32("qBaseInsert", fields[5])?,
            t_num_insert: parse_u32("tNumInsert", fields[6])?,
            t_base_insert: parse_i32("tBaseInsert", fields[7])?,
            strand: fields[8].to_string(),
            q_name: fields[9].to_string(),
            q_size: parse_u32("qSize", fields[10])?,
            q_start: parse_i32("qStart", fields[11])?,
            q_end: parse_i32("qEnd", fields[12])?,
            t_name: fields[13].to_string(),
            t_size: parse_u32("tSize", fields[14])?,
            t_start: parse_i32("tStart", fields[15])?,
            t_end: parse_i32("tEnd", fields[16])?,
            block_count: parse_u32("blockCount", fields[17])?,
            block_sizes: parse_vec("blockSizes", fields[18])?,
            q_starts: parse_vec("qStarts", fields[19])?,
            t_starts: parse_vec("tStarts", fields[20])?,
        };

        if psl.block_sizes.len() != psl.block_count as usize
            || psl.t_starts.len() != psl.block_count as usize
        {
            return Err(FormatError::InvalidField {
                line,
                field: "blockCount",
                value: psl.block_count.to_string(),
            });
        }

        Ok(psl)
    }

    /// Matching bases are within 98% of the query size.
    ///
    /// ```
    /// # use seqcov::libs::psl::Psl;
    /// let mut psl = Psl::default();
    /// psl.q_size = 100;
    /// psl.match_count = 98;
    /// assert!(psl.is_near_full_length());
    /// psl.match_count = 97;
    /// assert!(!psl.is_near_full_length());
    /// ```
    pub fn is_near_full_length(&self) -> bool {
        let length = self.q_size as i64;
        let score = self.match_count as i64;
        (length - score) * 50 <= length
    }
}

impl std::str::FromStr for Psl {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s, 0)
    }
}

/// The aligned blocks, on the target
impl IntervalSource for Psl {
    fn intervals(&self) -> Vec<Interval> {
        self.t_starts
            .iter()
            .zip(&self.block_sizes)
            .filter_map(|(&start, &size)| {
                Interval::new(&self.t_name, start as u64, start as u64 + size as u64).ok()
            })
            .collect()
    }
}

fn is_header(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with('#')
        || line.starts_with("psLayout")
        || line.starts_with("match")
        || line.starts_with("------")
        || line.starts_with(' ')
}

/// Reads all rows of a PSL table, skipping the psLayout header.
pub fn read_psl<R: BufRead>(reader: R) -> anyhow::Result<Vec<Psl>> {
    let mut psls = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if is_header(&line) {
            continue;
        }
        psls.push(Psl::parse_line(&line, i + 1)?);
    }
    Ok(psls)
}

/// Highest-scoring row of every query, in first-seen query order. Ties keep the earliest row.
pub fn best_per_query(psls: Vec<Psl>) -> Vec<Psl> {
    let mut best: IndexMap<String, Psl> = IndexMap::new();
    for psl in psls {
        match best.get_mut(&psl.q_name) {
            Some(cur) if psl.match_count > cur.match_count => *cur = psl,
            Some(_) => {}
            None => {
                best.insert(psl.q_name.clone(), psl);
            }
        }
    }
    best.into_values().collect()
}

/// Best rows that have at least one block and reach 98% of their query
pub fn near_full_length_best(psls: Vec<Psl>) -> Vec<Psl> {
    best_per_query(psls)
        .into_iter()
        .filter(|e| e.block_count >= 1 && e.is_near_full_length())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(matches: u32, q_name: &str, q_size: u32, t_name: &str, blocks: &str, t_starts: &str) -> String {
        let cnt = blocks.split(',').filter(|e| !e.is_empty()).count();
        format!(
            "{}\t0\t0\t0\t0\t0\t0\t0\t+\t{}\t{}\t0\t{}\t{}\t1000\t0\t100\t{}\t{}\t{}\t{}",
            matches, q_name, q_size, q_size, t_name, cnt, blocks, t_starts, t_starts
        )
    }

    #[test]
    fn test_parse_valid() {
        let line = "59\t13\t0\t0\t2\t3\t1\t1\t+\tquery\t100\t10\t90\ttarget\t200\t50\t130\t2\t40,40,\t10,50,\t50,90,";
        let psl: Psl = line.parse().unwrap();
        assert_eq!(psl.match_count, 59);
        assert_eq!(psl.block_count, 2);
        assert_eq!(psl.block_sizes, vec![40, 40]);
        assert_eq!(psl.q_starts, vec![10, 50]);
        assert_eq!(psl.t_starts, vec![50, 90]);
    }

    #[test]
    fn test_parse_invalid() {
        let res: Result<Psl, _> = "59\t13".parse();
        assert_eq!(
            res.unwrap_err(),
            FormatError::FieldCount {
                line: 0,
                expected: 21,
                found: 2
            }
        );

        let line = "invalid\t13\t0\t0\t2\t3\t1\t1\t+\tquery\t100\t10\t90\ttarget\t200\t50\t130\t2\t40,40,\t10,50,\t50,90,";
        let res: Result<Psl, _> = line.parse();
        assert!(matches!(res, Err(FormatError::InvalidField { field: "matches", .. })));
    }

    #[test]
    fn test_blocks_as_intervals() {
        let line = "59\t13\t0\t0\t2\t3\t1\t1\t+\tquery\t100\t10\t90\ttarget\t200\t50\t130\t2\t40,40,\t10,50,\t50,90,";
        let psl: Psl = line.parse().unwrap();
        let ivs = psl.intervals();
        assert_eq!(ivs.len(), 2);
        assert_eq!((ivs[0].seq(), ivs[0].start(), ivs[0].end()), ("target", 50, 90));
        assert_eq!((ivs[1].start(), ivs[1].end()), (90, 130));
    }

    #[test]
    fn test_best_per_query_keeps_first_of_ties() {
        let input = [
            row(90, "q1", 100, "chr1", "90,", "0,"),
            row(95, "q2", 100, "chr2", "95,", "0,"),
            row(90, "q1", 100, "chr3", "90,", "0,"),
            row(99, "q1", 100, "chr4", "99,", "0,"),
            row(95, "q2", 100, "chr5", "95,", "0,"),
        ]
        .join("\n");
        let psls = read_psl(input.as_bytes()).unwrap();
        let best = best_per_query(psls);

        assert_eq!(best.len(), 2);
        assert_eq!(best[0].q_name, "q1");
        assert_eq!(best[0].t_name, "chr4");
        assert_eq!(best[1].t_name, "chr2");
    }

    #[test]
    fn test_header_is_skipped() {
        let input = format!(
            "psLayout version 3\n\nmatch\tmis-\n     \tmatch\n---------------------\n{}\n",
            row(98, "q1", 100, "chr1", "50,48,", "0,60,")
        );
        let psls = read_psl(input.as_bytes()).unwrap();
        assert_eq!(psls.len(), 1);

        let best = near_full_length_best(psls);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].intervals().len(), 2);
    }

    #[test]
    fn test_partial_alignments_are_dropped() {
        let input = row(50, "q1", 100, "chr1", "50,", "0,");
        let psls = read_psl(input.as_bytes()).unwrap();
        assert!(near_full_length_best(psls).is_empty());
    }
}
