pub mod subset;

pub fn make_subcommand() -> clap::Command {
    clap::Command::new("fq")
        .about("Manipulate FASTQ files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(subset::make_subcommand())
}

pub fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("subset", sub_matches)) => subset::execute(sub_matches),
        _ => Ok(()),
    }
}
