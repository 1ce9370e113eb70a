use anyhow::Context;
use seqcov::libs::last::{AlignmentRecord, LastReader};

pub mod best;
pub mod complete;
pub mod connect;
pub mod gaps;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("last")
        .about("LAST alignments of transcripts and assemblies")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(best::make_subcommand())
        .subcommand(complete::make_subcommand())
        .subcommand(gaps::make_subcommand())
        .subcommand(connect::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("best", sub_matches)) => best::execute(sub_matches),
        Some(("complete", sub_matches)) => complete::execute(sub_matches),
        Some(("gaps", sub_matches)) => gaps::execute(sub_matches),
        Some(("connect", sub_matches)) => connect::execute(sub_matches),
        _ => Ok(()),
    }
}

/// All records of a MAF file, the file name is added to parse errors
pub fn read_records(infile: &str) -> anyhow::Result<Vec<AlignmentRecord>> {
    LastReader::new(seqcov::reader(infile)?)
        .collect::<anyhow::Result<Vec<_>>>()
        .with_context(|| format!("failed to parse {}", infile))
}
