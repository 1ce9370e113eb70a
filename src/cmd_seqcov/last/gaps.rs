use anyhow::Context;
use clap::*;
use seqcov::libs::coverage::{low_coverage_gaps, missing_bases, CoverageArray};
use seqcov::libs::depth::read_depth_table;
use seqcov::libs::gc::{gc_content, kmer_gc_frequencies};
use seqcov::libs::select::{best_per_query, group_by_subject};
use std::io::Write;
use std::ops::Range;
use tracing::{debug, info};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("gaps")
        .about("Gaps and covered regions of transcripts")
        .after_help(
            r###"
Walks the best alignments of every query along the transcripts (subjects) and reports the
maximal runs of uncovered and covered bases.

Output columns:
    transcript kind start end length gc kmer_gc

* kind    - `gap` or `covered`
* start   - 1-based
* gc      - GC proportion of the region
* kmer_gc - highest GC proportion of the --kmer windows in the region, NA if the region is
            shorter than --min-len

With --reads, bases supported by reads (depth > 0) are not counted as gaps.

With --stats, one line per transcript instead:
    transcript length missing low_read_depth

* missing        - bases no alignment reaches
* low_read_depth - missing bases with read depth 1 or less, all of them without --reads or
                   when the transcript has no row there

Examples:
1. Gaps of at least 10 bp and all covered regions:
   seqcov last gaps transcripts.maf transcripts.fa

2. Gaps without read support in a set of transcripts:
   seqcov last gaps transcripts.maf transcripts.fa --reads depth.tsv --names missing.lst

3. How much of the missing sequence reads also miss:
   seqcov last gaps transcripts.maf transcripts.fa --reads depth.tsv --stats

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("LAST MAF file, transcripts are the subjects"),
        )
        .arg(
            Arg::new("fasta")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Transcript sequences"),
        )
        .arg(
            Arg::new("kmer")
                .long("kmer")
                .num_args(1)
                .default_value("100")
                .value_parser(value_parser!(usize))
                .help("Window size of kmer_gc"),
        )
        .arg(
            Arg::new("min_len")
                .long("min-len")
                .num_args(1)
                .default_value("10")
                .value_parser(value_parser!(usize))
                .help("Shorter gaps are skipped"),
        )
        .arg(
            Arg::new("reads")
                .long("reads")
                .num_args(1)
                .help("Per-transcript read depths, `name<TAB>d1<TAB>d2...`"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .action(ArgAction::SetTrue)
                .help("Per-transcript counts of missing bases instead of regions"),
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
    let fasta = args.get_one::<String>("fasta").unwrap();
    let opt_kmer = *args.get_one::<usize>("kmer").unwrap();
    let opt_min_len = *args.get_one::<usize>("min_len").unwrap();
    let is_stats = args.get_flag("stats");

    let names = match args.get_one::<String>("names") {
        Some(file) => Some(seqcov::read_names(file)?),
        None => None,
    };
    let reads = match args.get_one::<String>("reads") {
        Some(file) => Some(
            read_depth_table(seqcov::reader(file)?, names.as_ref())
                .with_context(|| format!("failed to parse {}", file))?,
        ),
        None => None,
    };

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let alignments = group_by_subject(best_per_query(super::read_records(infile)?));

    let mut fa_in = noodles_fasta::io::Reader::new(seqcov::reader(fasta)?);
    let mut transcripts = 0;
    for result in fa_in.records() {
        let record = result?;
        let name = String::from_utf8(record.name().into())?;
        if names.as_ref().is_some_and(|e| !e.contains(&name)) {
            continue;
        }
        let seq = record.sequence().get(..).unwrap_or_default();
        transcripts += 1;

        let records = alignments.get(&name).map(|e| e.as_slice()).unwrap_or(&[]);
        let coverage = CoverageArray::build(seq.len(), records)
            .with_context(|| format!("{} doesn't match its alignments", name))?;
        let depth = reads
            .as_ref()
            .and_then(|e| e.get(&name))
            .map(|e| e.as_slice());

        if is_stats {
            let stats = missing_bases(&coverage, depth);
            writer.write_fmt(format_args!(
                "{}\t{}\t{}\t{}\n",
                name, stats.length, stats.missing, stats.low_read_depth
            ))?;
            continue;
        }

        let gaps: Vec<Range<usize>> = match reads.as_ref() {
            Some(_) => low_coverage_gaps(&coverage, depth.unwrap_or(&[])),
            None => coverage.gap_ranges(),
        };
        debug!("{}: {} gaps", name, gaps.len());

        let regions = gaps
            .into_iter()
            .map(|e| ("gap", e))
            .chain(coverage.covered_ranges().into_iter().map(|e| ("covered", e)));
        for (kind, range) in regions {
            if kind == "gap" && range.len() < opt_min_len {
                continue;
            }
            let region = &seq[range.clone()];
            let kmer_gc = kmer_gc_frequencies(region, opt_kmer, opt_min_len)
                .into_iter()
                .max_by(|a, b| a.total_cmp(b))
                .map(|e| format!("{:.4}", e))
                .unwrap_or_else(|| "NA".to_string());

            writer.write_fmt(format_args!(
                "{}\t{}\t{}\t{}\t{}\t{:.4}\t{}\n",
                name,
                kind,
                range.start + 1,
                range.end,
                range.len(),
                gc_content(region),
                kmer_gc
            ))?;
        }
    }
    info!("{} transcripts", transcripts);

    Ok(())
}
