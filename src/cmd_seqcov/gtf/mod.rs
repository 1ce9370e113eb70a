pub mod nonoverlap;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("gtf")
        .about("GTF/GFF annotations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(nonoverlap::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("nonoverlap", sub_matches)) => nonoverlap::execute(sub_matches),
        _ => Ok(()),
    }
}
