//! Detection command handlers.

use motion_core::{GLOBAL_ID, MotionClient};

use crate::cli::{DetectionArgs, DetectionCommand, GlobalOpts};
use crate::error::CliError;

use super::cameras::print_cameras;

pub async fn handle(
    client: &mut MotionClient,
    args: DetectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (target, paused) = match args.command {
        DetectionCommand::Start(target) => (target.camera, Some(false)),
        DetectionCommand::Pause(target) => (target.camera, Some(true)),
        DetectionCommand::Status(target) => (target.camera, None),
    };

    client.refresh(true).await?;

    if let Some(paused) = paused {
        if target == GLOBAL_ID {
            if paused {
                client.detection_pause(GLOBAL_ID).await;
            } else {
                client.detection_start(GLOBAL_ID).await;
            }
        } else {
            client.set_camera_paused(&target, paused).await?;
        }
    } else if target != GLOBAL_ID && client.camera(&target).is_none() {
        return Err(motion_core::CoreError::CameraNotFound { id: target }.into());
    }

    print_cameras(client, global, |view| target == GLOBAL_ID || view.id() == target);
    Ok(())
}
