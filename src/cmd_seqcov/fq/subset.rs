use anyhow::Context;
use clap::*;
use noodles_fastq::Record;
use rand::{Rng, SeedableRng};
use std::io::{BufRead, Write};
use tracing::{debug, info};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("subset")
        .about("Randomly subsets paired reads to a target number of bases")
        .after_help(
            r###"
Every `<name>-1.fq` is paired with `<name>-2.fq`. Mates are taken in file order and must come in
the same order in both files.

A first pass counts the bases of all pairs. The second pass keeps each pair with probability
`target / remaining`, where `target` is the number of bases still wanted and `remaining` the
number of bases not yet considered. The result is usually within one pair of the target.

Kept pairs are written to `<prefix>-1.fq` and `<prefix>-2.fq`, read names ending in `/1` and `/2`.

Output:
    Total bases<TAB>N
    Final output size<TAB>N

Examples:
1. 1 Gbp out of two libraries:
   seqcov fq subset 1000000000 sub/reads lib1-1.fq lib2-1.fq

2. Another random draw:
   seqcov fq subset 1000000000 sub/reads lib1-1.fq.gz --seed 7

"###,
        )
        .arg(
            Arg::new("target")
                .required(true)
                .num_args(1)
                .index(1)
                .value_parser(value_parser!(u64))
                .help("Number of bases wanted"),
        )
        .arg(
            Arg::new("prefix")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Prefix of the output files"),
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(3)
                .help("First-mate FASTQ files, named `*-1.fq`"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .num_args(1)
                .default_value("0")
                .value_parser(value_parser!(u64))
                .help("Random seed"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Where the base counts go. [stdout] for screen"),
        )
}

/// `lib-1.fq` => `lib-2.fq`
fn mate_file(file1: &str) -> anyhow::Result<String> {
    if !file1.contains("-1.fq") {
        return Err(anyhow::anyhow!("{} is not named like `*-1.fq`", file1));
    }
    Ok(file1.replacen("-1.fq", "-2.fq", 1))
}

struct PairReader {
    r1: noodles_fastq::io::Reader<Box<dyn BufRead>>,
    r2: noodles_fastq::io::Reader<Box<dyn BufRead>>,
    file1: String,
}

impl PairReader {
    fn new(file1: &str) -> anyhow::Result<Self> {
        let file2 = mate_file(file1)?;
        debug!("Now reading: {} {}", file1, file2);
        Ok(Self {
            r1: noodles_fastq::io::Reader::new(seqcov::reader(file1)?),
            r2: noodles_fastq::io::Reader::new(seqcov::reader(&file2)?),
            file1: file1.to_string(),
        })
    }

    fn next_pair(&mut self) -> anyhow::Result<Option<(Record, Record)>> {
        let mut rec1 = Record::default();
        let mut rec2 = Record::default();
        let n1 = self
            .r1
            .read_record(&mut rec1)
            .with_context(|| format!("failed to read {}", self.file1))?;
        let n2 = self
            .r2
            .read_record(&mut rec2)
            .with_context(|| format!("failed to read the mate of {}", self.file1))?;

        match (n1, n2) {
            (0, 0) => Ok(None),
            (0, _) | (_, 0) => Err(anyhow::anyhow!(
                "{} and its mate file hold different numbers of reads",
                self.file1
            )),
            _ => Ok(Some((rec1, rec2))),
        }
    }
}

fn bases(pair: &(Record, Record)) -> u64 {
    (pair.0.sequence().len() + pair.1.sequence().len()) as u64
}

/// `@name/1`, dropping any mate suffix the input carried
fn write_mate(writer: &mut dyn Write, record: &Record, mate: u8) -> anyhow::Result<()> {
    let name = String::from_utf8_lossy(record.name().as_ref()).into_owned();
    let name = match name.rsplit_once('/') {
        Some((base, _)) => base.to_string(),
        None => name,
    };
    writer.write_fmt(format_args!(
        "@{}/{}\n{}\n+\n{}\n",
        name,
        mate,
        String::from_utf8_lossy(record.sequence().as_ref()),
        String::from_utf8_lossy(record.quality_scores().as_ref())
    ))?;
    Ok(())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let opt_target = *args.get_one::<u64>("target").unwrap();
    let prefix = args.get_one::<String>("prefix").unwrap();
    let infiles: Vec<&String> = args.get_many::<String>("infiles").unwrap().collect();
    let opt_seed = *args.get_one::<u64>("seed").unwrap();

    let mut writer = seqcov::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Count
    //----------------------------
    let mut base_total = 0u64;
    for infile in &infiles {
        let mut pairs = PairReader::new(infile)?;
        while let Some(pair) = pairs.next_pair()? {
            base_total += bases(&pair);
        }
    }
    writer.write_fmt(format_args!("Total bases\t{}\n", base_total))?;

    //----------------------------
    // Subset
    //----------------------------
    let mut rng = rand::rngs::StdRng::seed_from_u64(opt_seed);
    let mut out1 = seqcov::writer(&format!("{}-1.fq", prefix))?;
    let mut out2 = seqcov::writer(&format!("{}-2.fq", prefix))?;

    // bases still wanted, may go below zero by the last pair
    let mut target = opt_target as i64;
    // bases not yet considered
    let mut remaining = base_total as i64;
    let mut kept = 0usize;
    for infile in &infiles {
        let mut pairs = PairReader::new(infile)?;
        while let Some(pair) = pairs.next_pair()? {
            let n = bases(&pair) as i64;
            if rng.gen::<f64>() < target as f64 / remaining as f64 {
                write_mate(&mut out1, &pair.0, 1)?;
                write_mate(&mut out2, &pair.1, 2)?;
                target -= n;
                kept += 1;
            }
            remaining -= n;
        }
    }
    info!("{} pairs kept", kept);

    writer.write_fmt(format_args!(
        "Final output size\t{}\n",
        opt_target as i64 - target
    ))?;

    Ok(())
}
