//! Command dispatch: bridges CLI args -> client facade -> output formatting.

pub mod actions;
pub mod cameras;
pub mod config_cmd;
pub mod detection;
pub mod profile;
pub mod status;

use motion_core::MotionClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a daemon-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &mut MotionClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(client, global).await,
        Command::Cameras => cameras::handle(client, global).await,
        Command::Config(args) => config_cmd::handle(client, args, global).await,
        Command::Detection(args) => detection::handle(client, args, global).await,
        Command::Restart(target) => actions::restart(client, &target.camera, global).await,
        Command::Snapshot(target) => actions::snapshot(client, &target.camera, global).await,
        Command::Makemovie(target) => actions::makemovie(client, &target.camera, global).await,
        // Profile and Completions are handled before dispatch
        Command::Profile(_) | Command::Completions(_) => unreachable!(),
    }
}
