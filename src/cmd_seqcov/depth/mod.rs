pub mod gc_bias;
pub mod mean;
pub mod transcript;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("depth")
        .about("Read depth tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(transcript::make_subcommand())
        .subcommand(mean::make_subcommand())
        .subcommand(gc_bias::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("transcript", sub_matches)) => transcript::execute(sub_matches),
        Some(("mean", sub_matches)) => mean::execute(sub_matches),
        Some(("gc-bias", sub_matches)) => gc_bias::execute(sub_matches),
        _ => Ok(()),
    }
}
