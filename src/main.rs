use clap::Parser;
use posom::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{extract, finalize},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Extract(_) => "extract",
        Command::Finalize(_) => "finalize",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Extract(args) => extract::extract(args)?,
        Command::Finalize(args) => finalize::finalize(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
