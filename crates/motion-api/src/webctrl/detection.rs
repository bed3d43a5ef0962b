// Webcontrol detection endpoints
//
// Netcam connection state and motion detection pause/resume. Responses are
// free text; callers scan them for `OK|Lost`, `ACTIVE|PAUSE` and the
// `paused`/`resumed` words.

use tracing::debug;

use crate::error::Error;
use crate::webctrl::client::HttpClient;

impl HttpClient {
    /// `GET /{id}/detection/connection`
    pub async fn detection_connection(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "polling netcam connection");
        self.detection(id, "connection").await
    }

    /// `GET /{id}/detection/status`
    pub async fn detection_status(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "polling detection status");
        self.detection(id, "status").await
    }

    /// `GET /{id}/detection/start`
    pub async fn detection_start(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "starting detection");
        self.detection(id, "start").await
    }

    /// `GET /{id}/detection/pause`
    pub async fn detection_pause(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "pausing detection");
        self.detection(id, "pause").await
    }

    async fn detection(&mut self, id: &str, command: &str) -> Result<String, Error> {
        let (body, _) = self.request(&format!("/{id}/detection/{command}")).await?;
        Ok(body)
    }
}
