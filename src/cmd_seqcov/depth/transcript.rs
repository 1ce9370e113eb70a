use anyhow::Context;
use clap::*;
use itertools::Itertools;
use seqcov::libs::depth::{wanted_positions, PositionDepths};
use seqcov::libs::gtf::read_annotation;
use std::io::Write;
use tracing::info;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("transcript")
        .about("Projects genomic read depths onto transcripts")
        .after_help(
            r###"
Reads `samtools depth` output (chrom, 1-based position, depth) and writes one row per transcript
of the GTF file, with the depth of every exon base in transcript orientation: exons of minus
strand transcripts are walked from their 3' genomic end.

Positions absent from the depth file have depth 0.

Output:
    transcript<TAB>d1<TAB>d2...

Example:
    samtools depth -a reads.bam > reads.depth
    seqcov depth transcript --gtf genes.gtf --depth reads.depth -o transcripts.depth.tsv

"###,
        )
        .arg(
            Arg::new("gtf")
                .long("gtf")
                .short('g')
                .required(true)
                .num_args(1)
                .help("GTF file with exon features carrying transcript_id"),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .short('d')
                .required(true)
                .num_args(1)
                .help("samtools depth output"),
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
    let gtf = args.get_one::<String>("gtf").unwrap();
    let depth = args.get_one::<String>("depth").unwrap();

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let transcripts = read_annotation(seqcov::reader(gtf)?)
        .with_context(|| format!("failed to parse {}", gtf))?
        .transcripts()
        .with_context(|| format!("failed to group exons of {}", gtf))?;
    let wanted = wanted_positions(transcripts.values());
    info!(
        "{} transcripts, {} bases wanted",
        transcripts.len(),
        wanted.values().map(|e| e.len()).sum::<usize>()
    );

    let depths = PositionDepths::read(seqcov::reader(depth)?, &wanted)
        .with_context(|| format!("failed to parse {}", depth))?;

    //----------------------------
    // Output
    //----------------------------
    for transcript in transcripts.values() {
        let row = depths.project(transcript).iter().join("\t");
        writer.write_fmt(format_args!("{}\t{}\n", transcript.name, row))?;
    }

    Ok(())
}
