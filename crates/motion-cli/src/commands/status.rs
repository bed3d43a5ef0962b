//! Daemon status.

use serde::Serialize;

use motion_core::{Features, MotionClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct DaemonStatus {
    name: String,
    unique_id: String,
    description: Option<String>,
    version: String,
    server_url: String,
    stream_url: String,
    features: Features,
    cameras: usize,
}

fn detail(s: &DaemonStatus) -> String {
    let f = &s.features;
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    [
        format!("Name:        {}", s.name),
        format!("ID:          {}", s.unique_id),
        format!("Description: {}", s.description.as_deref().unwrap_or("-")),
        format!("Version:     {}", s.version),
        format!("Webcontrol:  {}", s.server_url),
        format!("Streams:     {}", s.stream_url),
        format!("Cameras:     {}", s.cameras),
        format!(
            "Features:    html={} tls={} advanced_stream={} global_actions={}",
            yes_no(f.webhtml),
            yes_no(f.tls),
            yes_no(f.advanced_stream),
            yes_no(f.global_actions),
        ),
    ]
    .join("\n")
}

pub async fn handle(client: &mut MotionClient, global: &GlobalOpts) -> Result<(), CliError> {
    client.refresh(false).await?;

    let status = DaemonStatus {
        name: client.name(),
        unique_id: client.unique_id(),
        description: client.description().map(str::to_owned),
        version: client.version().to_string(),
        server_url: client.server_url(),
        stream_url: client.stream_url(),
        features: client.features(),
        cameras: client.cameras().count(),
    };

    let out = output::render_single(global.output, &status, detail, |s| s.version.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
