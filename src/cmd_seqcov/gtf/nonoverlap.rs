use anyhow::Context;
use clap::*;
use seqcov::libs::gtf::read_annotation;
use std::io::Write;
use tracing::info;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("nonoverlap")
        .about("Transcripts sharing no exon base with any other exon")
        .after_help(
            r###"
A transcript is dropped when any base of its exons is covered by two or more exon features,
its own included. Names are written in the order they first appear.

Example:
    seqcov gtf nonoverlap genes.gtf -o nonoverlap.lst

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("GTF file with exon features carrying transcript_id"),
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
    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    let annotation = read_annotation(seqcov::reader(infile)?)
        .with_context(|| format!("failed to parse {}", infile))?;
    let transcripts = annotation
        .nonoverlapping_transcripts()
        .with_context(|| format!("failed to group exons of {}", infile))?;
    info!("{}: {} nonoverlapping transcripts", infile, transcripts.len());

    for transcript in &transcripts {
        writer.write_fmt(format_args!("{}\n", transcript))?;
    }

    Ok(())
}
