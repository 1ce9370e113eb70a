//! Pairwise alignments in the MAF flavour written by LAST.
//!
//! ```text
//! a score=27 EG2=4.7e+04 E=2.6e-05
//! s ENST0001    7 25 + 1000 ACGTACGT-ACGTACGTACGTACGTAC
//! s scaffold_1 10 26 - 2000 ACGTACGTNACGTACGTACGTACGTAC
//! ```
//!
//! The first `s` line is the subject (the reference LAST indexed), the second the query.

use crate::libs::error::FormatError;
use std::io::BufRead;

/// One alignment block. Coordinates are 0-based as in MAF.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub score: i64,
    pub eg2: f64,
    pub e: f64,
    pub subject: String,
    pub subject_start: usize,
    pub subject_align_length: usize,
    pub subject_strand: char,
    pub subject_length: usize,
    pub subject_align_string: String,
    pub query: String,
    pub query_start: usize,
    pub query_align_length: usize,
    pub query_strand: char,
    pub query_length: usize,
    pub query_align_string: String,
    gapless_length: usize,
}

/// Columns where neither side is a gap and the query base is not an `N`.
///
/// ```
/// # use seqcov::libs::last::gapless_length;
/// assert_eq!(gapless_length("ACGT-A", "AC-TNA"), 4);
/// ```
pub fn gapless_length(subject_align_string: &str, query_align_string: &str) -> usize {
    query_align_string
        .bytes()
        .zip(subject_align_string.bytes())
        .filter(|&(q, s)| q != b'-' && q != b'N' && q != b'n' && s != b'-')
        .count()
}

impl AlignmentRecord {
    /// Builds a record from the two components of a block.
    pub fn new(score: i64, eg2: f64, e: f64, subject: Component, query: Component) -> Self {
        let gapless_length = gapless_length(&subject.text, &query.text);
        Self {
            score,
            eg2,
            e,
            subject: subject.src,
            subject_start: subject.start,
            subject_align_length: subject.size,
            subject_strand: subject.strand,
            subject_length: subject.src_size,
            subject_align_string: subject.text,
            query: query.src,
            query_start: query.start,
            query_align_length: query.size,
            query_strand: query.strand,
            query_length: query.src_size,
            query_align_string: query.text,
            gapless_length,
        }
    }

    pub fn gapless_length(&self) -> usize {
        self.gapless_length
    }

    /// Proportion of the query covered by gapless columns
    pub fn query_proportion(&self) -> f64 {
        self.gapless_length as f64 / self.query_length as f64
    }

    /// Proportion of the subject covered by gapless columns
    pub fn subject_proportion(&self) -> f64 {
        self.gapless_length as f64 / self.subject_length as f64
    }
}

/// An `s` line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub src: String,
    pub start: usize,
    pub size: usize,
    pub strand: char,
    pub src_size: usize,
    pub text: String,
}

impl Component {
    fn parse(s: &str, line: usize) -> Result<Self, FormatError> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 7 || fields[0] != "s" {
            return Err(FormatError::FieldCount {
                line,
                expected: 7,
                found: fields.len(),
            });
        }

        let parse_usize = |field: &'static str, v: &str| {
            v.parse::<usize>().map_err(|_| FormatError::InvalidField {
                line,
                field,
                value: v.to_string(),
            })
        };

        let strand = match fields[4] {
            "+" => '+',
            "-" => '-',
            other => {
                return Err(FormatError::InvalidField {
                    line,
                    field: "strand",
                    value: other.to_string(),
                })
            }
        };

        let src_size = parse_usize("sequence size", fields[5])?;
        if src_size == 0 {
            return Err(FormatError::InvalidField {
                line,
                field: "sequence size",
                value: fields[5].to_string(),
            });
        }

        Ok(Self {
            src: fields[1].to_string(),
            start: parse_usize("start", fields[2])?,
            size: parse_usize("aligned size", fields[3])?,
            strand,
            src_size,
            text: fields[6].to_string(),
        })
    }
}

/// The value of a `key=value` token
fn keyed<'a>(token: &'a str, key: &'static str, line: usize) -> Result<&'a str, FormatError> {
    match token.split_once('=') {
        Some((k, v)) if k == key => Ok(v),
        _ => Err(FormatError::InvalidField {
            line,
            field: key,
            value: token.to_string(),
        }),
    }
}

/// `a score=.. EG2=.. E=..`
fn parse_summary(s: &str, line: usize) -> Result<(i64, f64, f64), FormatError> {
    let fields: Vec<&str> = s.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(FormatError::FieldCount {
            line,
            expected: 4,
            found: fields.len(),
        });
    }

    let invalid = |field: &'static str, v: &str| FormatError::InvalidField {
        line,
        field,
        value: v.to_string(),
    };

    let score = keyed(fields[1], "score", line)?;
    let eg2 = keyed(fields[2], "EG2", line)?;
    let e = keyed(fields[3], "E", line)?;

    Ok((
        score.parse().map_err(|_| invalid("score", score))?,
        eg2.parse().map_err(|_| invalid("EG2", eg2))?,
        e.parse().map_err(|_| invalid("E", e))?,
    ))
}

/// Streams [`AlignmentRecord`]s out of LAST output.
///
/// Lines before an `a` line that don't start one are skipped, so headers and the `q`/`p`
/// lines LAST emits for FASTQ input are ignored.
pub struct LastReader<R> {
    reader: R,
    line_buf: String,
    line_no: usize,
}

impl<R: BufRead> LastReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: String::new(),
            line_no: 0,
        }
    }

    fn read_line(&mut self) -> std::io::Result<usize> {
        self.line_buf.clear();
        let n = self.reader.read_line(&mut self.line_buf)?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n)
    }

    fn read_component(&mut self, missing: &'static str) -> anyhow::Result<Component> {
        if self.read_line()? == 0 || !self.line_buf.starts_with('s') {
            return Err(FormatError::TruncatedBlock {
                line: self.line_no,
                missing,
            }
            .into());
        }
        Ok(Component::parse(&self.line_buf, self.line_no)?)
    }

    fn read_block(&mut self) -> anyhow::Result<AlignmentRecord> {
        let summary_line = self.line_no;
        let (score, eg2, e) = parse_summary(&self.line_buf, summary_line)?;
        let subject = self.read_component("subject")?;
        let query = self.read_component("query")?;

        if subject.text.len() != query.text.len() {
            return Err(FormatError::AlignedLength {
                line: self.line_no,
                subject: subject.text.len(),
                query: query.text.len(),
            }
            .into());
        }

        Ok(AlignmentRecord::new(score, eg2, e, subject, query))
    }
}

impl<R: BufRead> Iterator for LastReader<R> {
    type Item = anyhow::Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(0) => return None,
                Ok(_) => {
                    if !self.line_buf.starts_with('a') {
                        continue;
                    }
                    return Some(self.read_block());
                }
                Err(e) => return Some(Err(anyhow::Error::new(e))),
            }
        }
    }
}
