pub mod gc;
pub mod split;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("fa")
        .about("Fasta tools")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(gc::make_subcommand())
        .subcommand(split::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("gc", sub_matches)) => gc::execute(sub_matches),
        Some(("split", sub_matches)) => split::execute(sub_matches),
        _ => Ok(()),
    }
}
