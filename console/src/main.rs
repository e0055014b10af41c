mod correlate;
mod inputs;
mod profile;
mod run;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use correlate::CorrelateArgs;
use profile::ProfileArgs;
use run::RunArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Run the full reconciliation and write the result table.
    Run {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  RunArgs,
    },

    /// Dump the column correlation matrix of the published table.
    Correlate {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  CorrelateArgs,
    },

    /// Dump per-column minimums of the published table.
    Profile {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ProfileArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Run { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Correlate { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Profile { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
