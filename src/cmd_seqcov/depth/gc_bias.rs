use anyhow::Context;
use clap::*;
use seqcov::libs::depth::read_depth_table;
use seqcov::libs::gc::gc_depth_windows;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info, warn};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("gc-bias")
        .about("GC proportion of k-mer windows against their relative read depth")
        .after_help(
            r###"
Slides a window of --kmer bases along every transcript having a row in the depth table. Each
window gets its GC proportion and its mean read depth divided by the mean depth of the whole
transcript.

Transcripts shorter than the window, or with a mean depth of 0, give no windows.

Output:
    transcript<TAB>start<TAB>gc<TAB>relative_depth

With --summary, windows of equal GC are pooled:
    gc<TAB>mean_relative_depth<TAB>windows

Examples:
1. Every window:
   seqcov depth gc-bias transcripts.depth.tsv transcripts.fa

2. The GC bias curve of complete transcripts:
   seqcov depth gc-bias transcripts.depth.tsv transcripts.fa --names complete.lst --summary

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
            Arg::new("fasta")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Transcript sequences"),
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
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Mean relative depth per GC proportion"),
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
    let is_summary = args.get_flag("summary");
    if opt_kmer == 0 {
        return Err(anyhow::anyhow!("--kmer must be at least 1"));
    }

    let names = match args.get_one::<String>("names") {
        Some(file) => Some(seqcov::read_names(file)?),
        None => None,
    };
    let table = read_depth_table(seqcov::reader(infile)?, names.as_ref())
        .with_context(|| format!("failed to parse {}", infile))?;

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    // GC bases => (sum of relative depths, windows)
    let mut pooled: BTreeMap<usize, (f64, usize)> = BTreeMap::new();
    let mut transcripts = 0;

    let mut fa_in = noodles_fasta::io::Reader::new(seqcov::reader(fasta)?);
    for result in fa_in.records() {
        let record = result?;
        let name = String::from_utf8(record.name().into())?;
        let Some(depths) = table.get(&name) else {
            debug!("{} has no depths", name);
            continue;
        };
        let seq = record.sequence().get(..).unwrap_or_default();

        let windows = gc_depth_windows(seq, depths, opt_kmer);
        if windows.is_empty() {
            warn!("{} gives no windows", name);
            continue;
        }
        transcripts += 1;

        for window in &windows {
            if is_summary {
                let entry = pooled.entry(window.gc_bases).or_insert((0.0, 0));
                entry.0 += window.relative_depth;
                entry.1 += 1;
            } else {
                writer.write_fmt(format_args!(
                    "{}\t{}\t{:.4}\t{:.4}\n",
                    name,
                    window.start + 1,
                    window.gc,
                    window.relative_depth
                ))?;
            }
        }
    }
    info!("{} transcripts with windows", transcripts);

    for (gc_bases, (sum, count)) in &pooled {
        writer.write_fmt(format_args!(
            "{:.4}\t{:.4}\t{}\n",
            *gc_bases as f64 / opt_kmer as f64,
            sum / *count as f64,
            count
        ))?;
    }

    Ok(())
}
