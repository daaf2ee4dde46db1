use clap::{Parser, Subcommand};

use self::{run::RunArg, train::TrainArg};

mod run;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a decision policy with the genetic algorithm (batch mode)
    Train(#[clap(flatten)] TrainArg),
    /// Watch a population evolve in real time
    Run(#[clap(flatten)] RunArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Run(arg) => run::run(&arg)?,
    }
    Ok(())
}
