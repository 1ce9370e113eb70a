use anyhow::Context;
use clap::*;
use seqcov::libs::depth::{mean_depth, read_depth_table};
use std::io::Write;
use tracing::warn;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("mean")
        .about("Mean read depth of every transcript")
        .after_help(
            r###"
Input rows are `transcript<TAB>d1<TAB>d2...`, as written by `seqcov depth transcript`.

Rows without depths are skipped with a warning.

Examples:
1. All transcripts:
   seqcov depth mean transcripts.depth.tsv

2. A subset:
   seqcov depth mean transcripts.depth.tsv --names complete.lst

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Per-transcript depth table"),
        )
        .arg(
            Arg::new("names")
                .long("names")
                .num_args(1)
                .help("Only these transcripts, one per line"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let names = match args.get_one::<String>("names") {
        Some(file) => Some(seqcov::read_names(file)?),
        None => None,
    };

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    let table = read_depth_table(seqcov::reader(infile)?, names.as_ref())
        .with_context(|| format!("failed to parse {}", infile))?;
    for (transcript, depths) in &table {
        match mean_depth(depths) {
            Some(mean) => writer.write_fmt(format_args!("{}\t{}\n", transcript, mean))?,
            None => warn!("{} has no depths", transcript),
        }
    }

    Ok(())
}
