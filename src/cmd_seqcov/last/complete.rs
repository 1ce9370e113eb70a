use clap::*;
use seqcov::libs::select::{best_with_stats, Thresholds, TranscriptAnalysis};
use std::io::Write;
use tracing::info;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("complete")
        .about("Counts transcripts completely covered by an assembly")
        .after_help(
            r###"
Subjects are transcripts, queries are assembled sequences. After keeping the best alignments of
every query, an alignment is complete when the aligned proportions of both the query and the
subject reach their thresholds. Assembled sequences often carry more than one transcript, so by
default only the subject (transcript) side is held to a threshold.

A transcript is unambiguous when one of its complete alignments comes from a query that has no
other complete alignment.

Output:
    complete_transcripts<TAB>unambiguous_transcripts

Examples:
1. 95% of every transcript aligned, list the unambiguous ones:
   seqcov last complete transcripts.maf --names unambiguous.lst

2. Both sides aligned over 95%:
   seqcov last complete transcripts.maf --query-threshold 0.95

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("LAST MAF file"),
        )
        .arg(
            Arg::new("query_threshold")
                .long("query-threshold")
                .num_args(1)
                .default_value("0")
                .value_parser(value_parser!(f64))
                .help("Minimal aligned proportion of the query"),
        )
        .arg(
            Arg::new("subject_threshold")
                .long("subject-threshold")
                .num_args(1)
                .default_value("0.95")
                .value_parser(value_parser!(f64))
                .help("Minimal aligned proportion of the subject"),
        )
        .arg(
            Arg::new("names")
                .long("names")
                .num_args(1)
                .help("Write names of the unambiguous transcripts to this file"),
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
    let thresholds = Thresholds {
        query: *args.get_one::<f64>("query_threshold").unwrap(),
        subject: *args.get_one::<f64>("subject_threshold").unwrap(),
    };

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let (selected, stats) = best_with_stats(super::read_records(infile)?);
    info!(
        "{}: {} queries, {} with multiple alignments",
        infile, stats.queries, stats.multi_hit_queries
    );

    let analysis = TranscriptAnalysis::new(selected, &thresholds)?;
    let complete = analysis.complete_subjects().count();
    let unambiguous = analysis.unambiguous_subjects();
    info!(
        "{} covered, {} complete, {} unambiguous transcripts",
        analysis.covered_subjects().count(),
        complete,
        unambiguous.len()
    );

    //----------------------------
    // Output
    //----------------------------
    writer.write_fmt(format_args!("{}\t{}\n", complete, unambiguous.len()))?;

    if let Some(names) = args.get_one::<String>("names") {
        let mut names_writer = seqcov::writer(names)?;
        for subject in &unambiguous {
            names_writer.write_fmt(format_args!("{}\n", subject))?;
        }
    }

    Ok(())
}
