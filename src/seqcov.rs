extern crate clap;
use clap::*;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod cmd_seqcov;

fn init_logging(verbose: u8) {
    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => {
            let level = match verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            };
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init()
        }
    };
}

fn main() -> anyhow::Result<()> {
    let app = Command::new("seqcov")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`seqcov` - Sequencing coverage of genomes and transcripts")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More logging on stderr, repeat for more. RUST_LOG takes precedence"),
        )
        .subcommand(cmd_seqcov::exon_bases::make_subcommand())
        .subcommand(cmd_seqcov::last::make_subcommand())
        .subcommand(cmd_seqcov::depth::make_subcommand())
        .subcommand(cmd_seqcov::gtf::make_subcommand())
        .subcommand(cmd_seqcov::fa::make_subcommand())
        .subcommand(cmd_seqcov::fq::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Genome coverage:
    * exon-bases - Aligned bases inside and outside annotated exons

* Transcript alignments (LAST MAF):
    * last - best, complete, gaps, connect

* Read depth:
    * depth - transcript, mean, gc-bias

* Annotations and sequences:
    * gtf - nonoverlap
    * fa  - gc, split
    * fq  - subset

"###,
        );

    let matches = app.get_matches();
    init_logging(matches.get_count("verbose"));

    // Check which subcomamnd the user ran...
    match matches.subcommand() {
        Some(("exon-bases", sub_matches)) => cmd_seqcov::exon_bases::execute(sub_matches),
        Some(("last", sub_matches)) => cmd_seqcov::last::execute(sub_matches),
        Some(("depth", sub_matches)) => cmd_seqcov::depth::execute(sub_matches),
        Some(("gtf", sub_matches)) => cmd_seqcov::gtf::execute(sub_matches),
        Some(("fa", sub_matches)) => cmd_seqcov::fa::execute(sub_matches),
        Some(("fq", sub_matches)) => cmd_seqcov::fq::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
