//! Restart, snapshot and makemovie.

use motion_core::{GLOBAL_ID, MotionClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn restart(
    client: &mut MotionClient,
    camera: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    client.restart(camera).await?;
    if camera == GLOBAL_ID {
        output::notice("Daemon restart requested", global.quiet);
    } else {
        output::notice(&format!("Camera {camera} restart requested"), global.quiet);
    }
    Ok(())
}

pub async fn snapshot(
    client: &mut MotionClient,
    camera: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    client.snapshot(camera).await?;
    output::notice(&format!("Snapshot taken on camera {camera}"), global.quiet);
    Ok(())
}

pub async fn makemovie(
    client: &mut MotionClient,
    camera: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    client.makemovie(camera).await?;
    output::notice(&format!("New movie started on camera {camera}"), global.quiet);
    Ok(())
}
