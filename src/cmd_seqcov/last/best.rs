use clap::*;
use seqcov::libs::select::{best_with_stats, representative_with_stats};
use std::io::Write;
use tracing::info;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("best")
        .about("Best alignments of every query")
        .after_help(
            r###"
Alignments of a query are ranked by score, then by the aligned proportion of the query, then by
the aligned proportion of the subject. All alignments sharing the top score are kept.

Only gapless columns count towards aligned proportions; an `N` in the query is not aligned.

Output columns:
    query subject score EG2 E
    q_start q_size q_strand q_length
    s_start s_size s_strand s_length
    gapless q_prop s_prop

Notes:
* Queries don't need to be sorted
* --representative keeps only alignments tied with the best one on all three keys

Examples:
1. Best alignments of assembled scaffolds against transcripts:
   seqcov last best transcripts.maf

2. One representative per query, kept as a file:
   seqcov last best transcripts.maf --representative -o best.tsv

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
            Arg::new("representative")
                .long("representative")
                .action(ArgAction::SetTrue)
                .help("Break score ties by the aligned proportions"),
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
    let is_representative = args.get_flag("representative");

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let records = super::read_records(infile)?;
    let (selected, stats) = if is_representative {
        representative_with_stats(records)
    } else {
        best_with_stats(records)
    };
    info!(
        "{}: {} queries, {} with multiple alignments, {} selected",
        infile, stats.queries, stats.multi_hit_queries, stats.selected
    );

    //----------------------------
    // Output
    //----------------------------
    for rec in &selected {
        writer.write_fmt(format_args!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.4}\t{:.4}\n",
            rec.query,
            rec.subject,
            rec.score,
            rec.eg2,
            rec.e,
            rec.query_start,
            rec.query_align_length,
            rec.query_strand,
            rec.query_length,
            rec.subject_start,
            rec.subject_align_length,
            rec.subject_strand,
            rec.subject_length,
            rec.gapless_length(),
            rec.query_proportion(),
            rec.subject_proportion(),
        ))?;
    }

    Ok(())
}
