use clap::*;
use seqcov::libs::gtf::read_annotation;
use seqcov::libs::interval::Interval;
use seqcov::libs::psl::{near_full_length_best, read_psl};
use seqcov::libs::sweep::{accumulate, summarize, Dataset, ReferenceSummary};
use std::io::Write;
use tracing::{debug, info};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("exon-bases")
        .about("Counts aligned bases inside and outside annotated exons")
        .after_help(
            r###"
For every PSL file, the best alignment of each query is kept when its matching bases reach 98% of
the query size. Bases covered by the aligned blocks are counted once, however many queries
hit them.

Output columns:
* Genome (bp) - aligned bases
* Exome (bp)  - aligned bases inside exons

With --special, the last PSL file is the special dataset, two more columns report the bases also
covered by it.

Notes:
* Exons are the `exon` features of a GTF/GFF file
* `##sequence-region` lines set the sequence lengths, otherwise the last exon end is used
* Supports both plain text and gzipped (.gz) files

Examples:
1. Exome and genome bases of two assemblies:
   seqcov exon-bases exons.gff asm1.psl asm2.psl

2. Bases shared with a reference assembly:
   seqcov exon-bases exons.gff asm1.psl asm2.psl ref.psl --special

"###,
        )
        .arg(
            Arg::new("exons")
                .required(true)
                .num_args(1)
                .index(1)
                .help("GTF/GFF file with exon features"),
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(2)
                .help("PSL files of aligned assemblies"),
        )
        .arg(
            Arg::new("special")
                .long("special")
                .action(ArgAction::SetTrue)
                .help("Report overlaps with the last PSL file"),
        )
        .arg(
            Arg::new("strip_version")
                .long("strip-version")
                .action(ArgAction::SetTrue)
                .help("Drop `.N` suffixes from annotation sequence names"),
        )
        .arg(
            Arg::new("patterns")
                .long("patterns")
                .action(ArgAction::SetTrue)
                .help("Also write base counts of every coverage pattern"),
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

/// `NC_000001.11` => `NC_000001`
fn strip_version(seq: &str) -> &str {
    seq.split('.').next().unwrap_or(seq)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let exons_file = args.get_one::<String>("exons").unwrap();
    let infiles: Vec<&String> = args.get_many::<String>("infiles").unwrap().collect();
    let is_special = args.get_flag("special");
    let is_strip = args.get_flag("strip_version");
    let is_patterns = args.get_flag("patterns");

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Reference
    //----------------------------
    let annotation = read_annotation(seqcov::reader(exons_file)?)?;
    let mut reference = Dataset::new(exons_file);
    for exon in annotation.intervals() {
        if is_strip {
            let seq = strip_version(exon.seq());
            reference.add(&Interval::new(seq, exon.start(), exon.end())?);
        } else {
            reference.add(&exon);
        }
    }
    for (seq, length) in &annotation.lengths {
        if is_strip {
            reference.mark_end(strip_version(seq), *length);
        } else {
            reference.mark_end(seq, *length);
        }
    }
    info!(
        "{}: {} exons on {} sequences",
        exons_file,
        annotation.exons.len(),
        reference.seqs().count()
    );

    let summary = ReferenceSummary::of(&reference);
    writer.write_fmt(format_args!(
        "Bases in {}\tGenome {}\tExome {}\n",
        exons_file, summary.genome, summary.covered
    ))?;

    //----------------------------
    // Aligned assemblies
    //----------------------------
    let mut datasets = vec![reference];
    for infile in &infiles {
        let psls = read_psl(seqcov::reader(infile)?)?;
        let rows = psls.len();
        let best = near_full_length_best(psls);
        debug!("{}: {} rows, {} kept", infile, rows, best.len());

        let mut dataset = Dataset::new(infile);
        dataset.extend(best.as_slice());
        datasets.push(dataset);
    }

    //----------------------------
    // Output
    //----------------------------
    let totals = accumulate(&datasets);
    let special = if is_special {
        Some(datasets.len() - 1)
    } else {
        None
    };

    if is_special {
        writer.write_fmt(format_args!(
            "Filename\tGenome (bp)\tExome (bp)\tGenome overlap (bp)\tExome overlap (bp)\n"
        ))?;
    } else {
        writer.write_fmt(format_args!("Filename\tGenome (bp)\tExome (bp)\n"))?;
    }
    for row in summarize(&datasets, &totals, 0, special) {
        match (row.genome_overlap, row.exome_overlap) {
            (Some(genome_overlap), Some(exome_overlap)) => writer.write_fmt(format_args!(
                "{}\t{}\t{}\t{}\t{}\n",
                row.name, row.genome_total, row.exome_total, genome_overlap, exome_overlap
            ))?,
            _ => writer.write_fmt(format_args!(
                "{}\t{}\t{}\n",
                row.name, row.genome_total, row.exome_total
            ))?,
        }
    }

    if is_patterns {
        writer.write_fmt(format_args!("Pattern\tBases\n"))?;
        for (pattern, count) in totals.merged() {
            writer.write_fmt(format_args!("{}\t{}\n", pattern, count))?;
        }
    }

    Ok(())
}
