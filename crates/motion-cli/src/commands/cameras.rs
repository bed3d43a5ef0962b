//! Camera listing, shared by `cameras` and `detection status`.

use serde::Serialize;
use tabled::Tabled;

use motion_core::{CameraView, MotionClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
pub struct CameraSummary {
    id: String,
    camera_id: String,
    name: Option<String>,
    connected: bool,
    paused: bool,
    stream_url: String,
    image_url: Option<String>,
}

impl From<CameraView<'_>> for CameraSummary {
    fn from(view: CameraView<'_>) -> Self {
        Self {
            id: view.id().to_owned(),
            camera_id: view.camera_id(),
            name: view.name().map(str::to_owned),
            connected: view.connected(),
            paused: view.paused(),
            stream_url: view.stream_url(),
            image_url: view.image_url(),
        }
    }
}

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Camera ID")]
    camera_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Connection")]
    connection: &'static str,
    #[tabled(rename = "Detection")]
    detection: &'static str,
    #[tabled(rename = "Stream")]
    stream_url: String,
}

impl From<&CameraSummary> for CameraRow {
    fn from(c: &CameraSummary) -> Self {
        Self {
            id: c.id.clone(),
            camera_id: c.camera_id.clone(),
            name: c.name.clone().unwrap_or_default(),
            connection: if c.connected { "OK" } else { "lost" },
            detection: if c.paused { "paused" } else { "active" },
            stream_url: c.stream_url.clone(),
        }
    }
}

/// Print the cameras `keep` selects from the client's current state.
pub fn print_cameras(
    client: &MotionClient,
    global: &GlobalOpts,
    keep: impl Fn(&CameraView<'_>) -> bool,
) {
    let cameras: Vec<CameraSummary> = client
        .cameras()
        .filter(|view| keep(view))
        .map(CameraSummary::from)
        .collect();
    let out = output::render_list(
        global.output,
        &cameras,
        |c| CameraRow::from(c),
        |c| c.id.clone(),
    );
    output::print_output(&out, global.quiet);
}

pub async fn handle(client: &mut MotionClient, global: &GlobalOpts) -> Result<(), CliError> {
    client.refresh(true).await?;
    print_cameras(client, global, |_| true);
    Ok(())
}
