use clap::*;
use tracing::info;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("split")
        .about("Splits a FASTA file into parts of similar total length")
        .after_help(
            r###"
Sequences are dealt in input order, each one to the part with the fewest bases so far (the first
such part on ties). Parts are written to `<prefix>_part_<N>.fa`, N zero-padded to the number of
digits of <parts>.

Example:
    seqcov fa split transcripts.fa 4 chunks/tx
    # chunks/tx_part_0.fa .. chunks/tx_part_3.fa

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Input FASTA file"),
        )
        .arg(
            Arg::new("parts")
                .required(true)
                .num_args(1)
                .index(2)
                .value_parser(value_parser!(usize))
                .help("Number of parts"),
        )
        .arg(
            Arg::new("prefix")
                .required(true)
                .num_args(1)
                .index(3)
                .help("Prefix of the output files"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let parts = *args.get_one::<usize>("parts").unwrap();
    let prefix = args.get_one::<String>("prefix").unwrap();
    if parts == 0 {
        return Err(anyhow::anyhow!("<parts> must be at least 1"));
    }

    let digits = parts.to_string().len();
    let mut fa_outs = vec![];
    for i in 0..parts {
        let outfile = format!("{}_part_{:0width$}.fa", prefix, i, width = digits);
        let writer = seqcov::writer(&outfile)?;
        fa_outs.push(
            noodles_fasta::io::writer::Builder::default()
                .set_line_base_count(usize::MAX)
                .build_from_writer(writer),
        );
    }
    let mut lengths = vec![0usize; parts];

    //----------------------------
    // Process
    //----------------------------
    let mut fa_in = noodles_fasta::io::Reader::new(seqcov::reader(infile)?);
    for result in fa_in.records() {
        let record = result?;

        // position of the first minimum
        let mut idx = 0;
        for (i, len) in lengths.iter().enumerate() {
            if *len < lengths[idx] {
                idx = i;
            }
        }

        fa_outs[idx].write_record(&record)?;
        lengths[idx] += record.sequence().len();
    }
    info!("part lengths: {:?}", lengths);

    Ok(())
}
