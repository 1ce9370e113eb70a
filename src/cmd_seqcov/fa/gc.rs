use clap::*;
use seqcov::libs::gc::{gc_content, max_kmer_gc};
use std::io::Write;
use tracing::warn;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("gc")
        .about("Highest k-mer GC proportion of every sequence")
        .after_help(
            r###"
Slides a window of --kmer bases along every sequence and reports the highest GC proportion.
Sequences shorter than the window are one window.

Output:
    name<TAB>max_kmer_gc[<TAB>gc]

Notes:
* Bases are counted case insensitively
* Supports both plain text and gzipped (.gz) files
* Reads from stdin if input file is 'stdin'

Examples:
1. Default 100 bp windows:
   seqcov fa gc transcripts.fa

2. 50 bp windows, with the GC of the whole sequence:
   seqcov fa gc transcripts.fa --kmer 50 --total

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input FASTA file(s) to process"),
        )
        .arg(
            Arg::new("kmer")
                .long("kmer")
                .short('k')
                .num_args(1)
                .default_value("100")
                .value_parser(value_parser!(usize))
                .help("Window size"),
        )
        .arg(
            Arg::new("total")
                .long("total")
                .action(ArgAction::SetTrue)
                .help("Also output the GC proportion of the whole sequence"),
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
    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;
    let opt_kmer = *args.get_one::<usize>("kmer").unwrap();
    let is_total = args.get_flag("total");

    for infile in args.get_many::<String>("infiles").unwrap() {
        let reader = seqcov::reader(infile)?;
        let mut fa_in = noodles_fasta::io::Reader::new(reader);

        for result in fa_in.records() {
            let record = result?;
            let name = String::from_utf8(record.name().into())?;
            let seq = record.sequence().get(..).unwrap_or_default();

            let Some(max_gc) = max_kmer_gc(seq, opt_kmer) else {
                warn!("{} is empty", name);
                continue;
            };

            if is_total {
                writer.write_fmt(format_args!("{}\t{}\t{}\n", name, max_gc, gc_content(seq)))?;
            } else {
                writer.write_fmt(format_args!("{}\t{}\n", name, max_gc))?;
            }
        }
    }

    Ok(())
}
