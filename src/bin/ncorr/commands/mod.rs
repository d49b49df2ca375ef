mod build;
mod check;

use build::run_build;
use check::run_check;

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

/// What a successful command run found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every atom type is complete and free of errors.
    Clean,
    /// The table is incomplete or carries diagnostics.
    Issues,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::Issues => ExitCode::from(1),
        }
    }
}

pub fn dispatch(command: Command, ctx: Context) -> Result<Outcome> {
    match command {
        Command::Build(args) => run_build(args, ctx).map(|()| Outcome::Clean),
        Command::Check(args) => run_check(args, ctx),
    }
}
