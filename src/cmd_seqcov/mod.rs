//! Subcommand modules for the `seqcov` binary.

pub mod depth;
pub mod exon_bases;
pub mod fa;
pub mod fq;
pub mod gtf;
pub mod last;
