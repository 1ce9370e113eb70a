use crate::libs::error::FormatError;
use crate::libs::interval::Interval;
use crate::libs::sweep::depth_runs;
use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::io::BufRead;

lazy_static! {
    // GTF: gene_id "G1"; transcript_id "T1";
    static ref RE_GTF_ATTR: Regex = Regex::new(r#"([^\s;]+)\s+"([^"]*)""#).unwrap();
    // GFF3: ID=exon1;Parent=T1
    static ref RE_GFF_ATTR: Regex = Regex::new(r"([^\s;=]+)=([^;]*)").unwrap();
}

/// Column 9 of a GTF or GFF3 line
///
/// ```
/// # use seqcov::libs::gtf::parse_attributes;
/// let attrs = parse_attributes(r#"gene_id "G1"; transcript_id "T1.2";"#);
/// assert_eq!(attrs.get("transcript_id").unwrap(), "T1.2");
/// let attrs = parse_attributes("ID=e1;Parent=T1");
/// assert_eq!(attrs.get("Parent").unwrap(), "T1");
/// ```
pub fn parse_attributes(field: &str) -> IndexMap<String, String> {
    let mut attrs = IndexMap::new();
    for cap in RE_GTF_ATTR.captures_iter(field) {
        attrs.insert(cap[1].to_string(), cap[2].to_string());
    }
    if attrs.is_empty() {
        for cap in RE_GFF_ATTR.captures_iter(field) {
            attrs.insert(cap[1].to_string(), cap[2].trim().to_string());
        }
    }
    attrs
}

/// An `exon` feature
#[derive(Debug, Clone, PartialEq)]
pub struct Exon {
    pub interval: Interval,
    pub strand: char,
    pub attributes: IndexMap<String, String>,
}

impl Exon {
    /// `transcript_id` in GTF, `Parent` in GFF3
    pub fn transcript_id(&self) -> Option<&str> {
        self.attributes
            .get("transcript_id")
            .or_else(|| self.attributes.get("Parent"))
            .map(|e| e.as_str())
    }
}

/// One meaningful line of an annotation file
#[derive(Debug, Clone, PartialEq)]
pub enum GffLine {
    Exon(Exon),
    /// `##sequence-region seq start end`, `end` is the 1-based last base
    SequenceRegion { seq: String, end: u64 },
    Other,
}

fn parse_u64(value: &str, field: &'static str, line: usize) -> Result<u64, FormatError> {
    value.parse::<u64>().map_err(|_| FormatError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

/// Parses one line. Comments other than `##sequence-region`, blank lines and features other
/// than exons are [`GffLine::Other`].
pub fn parse_line(line: &str, line_no: usize) -> Result<GffLine, FormatError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(GffLine::Other);
    }

    if line.starts_with('#') {
        if let Some(rest) = line.strip_prefix("##sequence-region ") {
            let fields: Vec<&str> = rest.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(FormatError::FieldCount {
                    line: line_no,
                    expected: 4,
                    found: fields.len() + 1,
                });
            }
            return Ok(GffLine::SequenceRegion {
                seq: fields[0].to_string(),
                end: parse_u64(fields[2], "sequence-region end", line_no)?,
            });
        }
        return Ok(GffLine::Other);
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(FormatError::FieldCount {
            line: line_no,
            expected: 9,
            found: fields.len(),
        });
    }
    if fields[2] != "exon" {
        return Ok(GffLine::Other);
    }
    if fields.len() < 9 {
        return Err(FormatError::FieldCount {
            line: line_no,
            expected: 9,
            found: fields.len(),
        });
    }

    let start = parse_u64(fields[3], "start", line_no)?;
    let end = parse_u64(fields[4], "end", line_no)?;
    let interval = Interval::from_one_based(fields[0], start, end).map_err(|e| match e {
        FormatError::InvalidField { field, value, .. } => FormatError::InvalidField {
            line: line_no,
            field,
            value,
        },
        other => other,
    })?;

    Ok(GffLine::Exon(Exon {
        interval,
        strand: fields[6].chars().next().unwrap_or('.'),
        attributes: parse_attributes(fields[8]),
    }))
}

/// Exons and declared sequence lengths of an annotation file
#[derive(Debug, Default, Clone)]
pub struct Annotation {
    pub exons: Vec<Exon>,
    /// 0-based exclusive ends from `##sequence-region`
    pub lengths: IndexMap<String, u64>,
}

/// Reads all exons and sequence regions.
pub fn read_annotation<R: BufRead>(reader: R) -> anyhow::Result<Annotation> {
    let mut annotation = Annotation::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line, i + 1)? {
            GffLine::Exon(exon) => annotation.exons.push(exon),
            GffLine::SequenceRegion { seq, end } => {
                annotation.lengths.insert(seq, end);
            }
            GffLine::Other => {}
        }
    }
    Ok(annotation)
}

impl Annotation {
    pub fn intervals(&self) -> Vec<Interval> {
        self.exons.iter().map(|e| e.interval.clone()).collect()
    }

    /// Exons grouped into transcripts, in first-seen order.
    pub fn transcripts(&self) -> Result<IndexMap<String, Transcript>, FormatError> {
        let mut transcripts: IndexMap<String, Transcript> = IndexMap::new();
        for exon in &self.exons {
            let id = exon.transcript_id().ok_or_else(|| FormatError::InvalidField {
                line: 0,
                field: "transcript_id",
                value: exon.interval.to_string(),
            })?;
            transcripts
                .entry(id.to_string())
                .or_insert_with(|| Transcript::new(id, exon.interval.seq(), exon.strand))
                .add_exon(exon.interval.clone());
        }
        Ok(transcripts)
    }

    /// Transcripts none of whose exon bases is shared with another exon.
    pub fn nonoverlapping_transcripts(&self) -> Result<Vec<String>, FormatError> {
        let intervals = self.intervals();
        let runs = depth_runs(&intervals, 2);
        // runs come out per sequence, sorted and disjoint
        let mut shared: IndexMap<&str, Vec<&Interval>> = IndexMap::new();
        for run in &runs {
            shared.entry(run.seq()).or_default().push(run);
        }
        let is_shared = |exon: &Interval| {
            let Some(runs) = shared.get(exon.seq()) else {
                return false;
            };
            let idx = runs.partition_point(|e| e.end() <= exon.start());
            idx < runs.len() && runs[idx].start() < exon.end()
        };

        let mut all: IndexSet<String> = IndexSet::new();
        let mut duplicated: HashSet<String> = HashSet::new();
        for exon in &self.exons {
            let id = exon.transcript_id().ok_or_else(|| FormatError::InvalidField {
                line: 0,
                field: "transcript_id",
                value: exon.interval.to_string(),
            })?;
            all.insert(id.to_string());
            if is_shared(&exon.interval) {
                duplicated.insert(id.to_string());
            }
        }

        Ok(all.into_iter().filter(|e| !duplicated.contains(e)).collect())
    }
}

/// Exons of one transcript, in transcript orientation
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub name: String,
    pub seq: String,
    pub strand: char,
    pub exons: Vec<Interval>,
}

impl Transcript {
    pub fn new(name: &str, seq: &str, strand: char) -> Self {
        Self {
            name: name.to_string(),
            seq: seq.to_string(),
            strand,
            exons: vec![],
        }
    }

    /// Exons of `-` strand transcripts are listed in reverse
    pub fn add_exon(&mut self, exon: Interval) {
        if self.strand == '-' {
            self.exons.insert(0, exon);
        } else {
            self.exons.push(exon);
        }
    }

    /// 0-based genomic positions from the 5' end of the transcript
    pub fn positions(&self) -> Vec<u64> {
        let mut positions = vec![];
        for exon in &self.exons {
            if self.strand == '-' {
                positions.extend((exon.start()..exon.end()).rev());
            } else {
                positions.extend(exon.start()..exon.end());
            }
        }
        positions
    }

    pub fn len(&self) -> u64 {
        self.exons.iter().map(|e| e.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.exons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GTF: &str = "\
##sequence-region chr1 1 1000
#!genome-build test
chr1\ttest\tgene\t1\t50\t.\t+\t.\tgene_id \"G1\";
chr1\ttest\texon\t1\t10\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";
chr1\ttest\texon\t21\t30\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";
chr1\ttest\texon\t101\t110\t.\t-\t.\tgene_id \"G2\"; transcript_id \"T2\";
chr1\ttest\texon\t201\t210\t.\t-\t.\tgene_id \"G2\"; transcript_id \"T2\";
chr1\ttest\texon\t205\t220\t.\t-\t.\tgene_id \"G3\"; transcript_id \"T3\";
";

    #[test]
    fn test_read_annotation() {
        let annotation = read_annotation(GTF.as_bytes()).unwrap();
        assert_eq!(annotation.exons.len(), 5);
        assert_eq!(annotation.lengths.get("chr1"), Some(&1000));

        let first = &annotation.exons[0].interval;
        assert_eq!((first.seq(), first.start(), first.end()), ("chr1", 0, 10));
        assert_eq!(annotation.exons[0].transcript_id(), Some("T1"));
    }

    #[test]
    fn test_transcripts() {
        let annotation = read_annotation(GTF.as_bytes()).unwrap();
        let transcripts = annotation.transcripts().unwrap();
        assert_eq!(transcripts.keys().collect::<Vec<_>>(), vec!["T1", "T2", "T3"]);

        let t1 = &transcripts["T1"];
        assert_eq!(t1.len(), 20);
        assert_eq!(&t1.positions()[8..12], &[8, 9, 20, 21]);

        // minus strand transcripts start at the last exon, walking down
        let t2 = &transcripts["T2"];
        assert_eq!(t2.exons[0].start(), 200);
        let positions = t2.positions();
        assert_eq!(positions[0], 209);
        assert_eq!(&positions[9..11], &[200, 109]);
        assert_eq!(*positions.last().unwrap(), 100);
    }

    #[test]
    fn test_nonoverlapping() {
        let annotation = read_annotation(GTF.as_bytes()).unwrap();
        assert_eq!(annotation.nonoverlapping_transcripts().unwrap(), vec!["T1"]);
    }

    #[test]
    fn test_nonoverlapping_many_sequences() {
        // exons touching a shared run end to end don't share bases with it
        let mut gtf = String::new();
        for seq in ["chr1", "chr2", "chr3"] {
            for i in 0..200u64 {
                let start = i * 7 + 1;
                let end = start + 3 + i % 9;
                gtf += &format!(
                    "{}\tt\texon\t{}\t{}\t.\t+\t.\ttranscript_id \"{}_{}\";\n",
                    seq, start, end, seq, i
                );
            }
        }
        let annotation = read_annotation(gtf.as_bytes()).unwrap();

        let runs = depth_runs(&annotation.intervals(), 2);
        let expected: Vec<String> = annotation
            .exons
            .iter()
            .filter(|exon| !runs.iter().any(|e| e.overlaps(&exon.interval)))
            .map(|exon| exon.transcript_id().unwrap().to_string())
            .collect();

        let found = annotation.nonoverlapping_transcripts().unwrap();
        assert!(!found.is_empty());
        assert!(found.len() < 600);
        assert_eq!(found, expected);
    }

    #[test]
    fn test_gff3_parent() {
        let line = "chr2\tsrc\texon\t5\t9\t.\t+\t.\tID=e1;Parent=T9";
        match parse_line(line, 1).unwrap() {
            GffLine::Exon(exon) => {
                assert_eq!(exon.transcript_id(), Some("T9"));
                assert_eq!(exon.interval.len(), 5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            parse_line("chr1\ttest", 7).unwrap_err(),
            FormatError::FieldCount {
                line: 7,
                expected: 9,
                found: 2
            }
        );
        assert!(matches!(
            parse_line("chr1\tt\texon\tx\t10\t.\t+\t.\t", 3),
            Err(FormatError::InvalidField {
                line: 3,
                field: "start",
                ..
            })
        ));
        assert!(matches!(
            parse_line("chr1\tt\texon\t0\t10\t.\t+\t.\t", 4),
            Err(FormatError::InvalidField { line: 4, .. })
        ));
        assert!(matches!(
            parse_line("chr1\tt\texon\t20\t10\t.\t+\t.\t", 5),
            Err(FormatError::EmptyInterval { .. })
        ));
        assert!(parse_line("##sequence-region chr1 1", 1).is_err());
    }

    #[test]
    fn test_missing_transcript_id() {
        let line = "chr1\tt\texon\t1\t10\t.\t+\t.\tgene_id \"G1\";\n";
        let annotation = read_annotation(line.as_bytes()).unwrap();
        assert!(annotation.transcripts().is_err());
    }
}
