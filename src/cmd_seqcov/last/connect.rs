use anyhow::Context;
use clap::*;
use indexmap::IndexMap;
use seqcov::libs::connect::count_states;
use seqcov::libs::coverage::coverage_by_subject;
use seqcov::libs::depth::read_depth_table;
use seqcov::libs::select::best_per_query;
use std::io::Write;
use tracing::{info, warn};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("connect")
        .about("Classifies transcript bases by read support next to assembled regions")
        .after_help(
            r###"
Every base of a transcript gets one of four states:

* low_depth          - not assembled, read depth below --min-depth
* transcript_covered - covered by the best alignment of an assembled sequence
* disconnected       - enough reads, but not reachable from an assembled base
* connected          - enough reads on a run touching an assembled base

Read depths come either from a per-transcript depth table (--depth) or from alignments of reads
against the transcripts (--reads). Missing depths are zero.

Output columns:
    transcript length low_depth transcript_covered disconnected connected

Examples:
1. Depths from a table:
   seqcov last connect transcripts.maf --depth depth.tsv

2. Depths from read alignments, for a set of transcripts:
   seqcov last connect transcripts.maf --reads reads.maf --names missing.lst

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("LAST MAF file of assembled sequences against transcripts"),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .num_args(1)
                .help("Per-transcript read depths, `name<TAB>d1<TAB>d2...`"),
        )
        .arg(
            Arg::new("reads")
                .long("reads")
                .num_args(1)
                .help("LAST MAF file of reads against transcripts"),
        )
        .group(
            ArgGroup::new("read_depth")
                .args(["depth", "reads"])
                .required(true),
        )
        .arg(
            Arg::new("min_depth")
                .long("min-depth")
                .num_args(1)
                .default_value("5")
                .value_parser(value_parser!(u32))
                .help("Read depth of a supported base"),
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
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let opt_min_depth = *args.get_one::<u32>("min_depth").unwrap();

    let names = match args.get_one::<String>("names") {
        Some(file) => Some(seqcov::read_names(file)?),
        None => None,
    };

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let coverage = coverage_by_subject(best_per_query(super::read_records(infile)?))
        .with_context(|| format!("failed to walk alignments of {}", infile))?;
    info!("{}: {} transcripts covered", infile, coverage.len());

    let read_depth: IndexMap<String, Vec<u32>> = if let Some(file) = args.get_one::<String>("depth")
    {
        read_depth_table(seqcov::reader(file)?, names.as_ref())
            .with_context(|| format!("failed to parse {}", file))?
    } else if let Some(file) = args.get_one::<String>("reads") {
        coverage_by_subject(best_per_query(super::read_records(file)?))
            .with_context(|| format!("failed to walk alignments of {}", file))?
            .into_iter()
            .map(|(subject, depths)| (subject, depths.depths().to_vec()))
            .collect()
    } else {
        unreachable!()
    };

    //----------------------------
    // Output
    //----------------------------
    let subjects: Vec<String> = match names.as_ref() {
        Some(names) => names.iter().cloned().collect(),
        None => coverage.keys().cloned().collect(),
    };
    for subject in &subjects {
        let Some(transcript_coverage) = coverage.get(subject) else {
            warn!("{} has no alignments", subject);
            continue;
        };
        let depth = read_depth
            .get(subject)
            .map(|e| e.as_slice())
            .unwrap_or(&[]);

        let counts = count_states(transcript_coverage.depths(), depth, opt_min_depth);
        writer.write_fmt(format_args!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            subject,
            transcript_coverage.len(),
            counts.low_depth,
            counts.transcript_covered,
            counts.disconnected,
            counts.connected
        ))?;
    }

    Ok(())
}
