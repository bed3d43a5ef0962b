// Webcontrol action endpoints
//
// Thread restart and per-camera capture triggers.

use tracing::debug;

use crate::error::Error;
use crate::webctrl::client::HttpClient;

impl HttpClient {
    /// Restart thread `id`. Restarting the global id restarts every camera.
    ///
    /// `GET /{id}/action/restart`
    pub async fn action_restart(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "restarting thread");
        self.action(id, "restart").await
    }

    /// `GET /{id}/action/makemovie`
    pub async fn action_makemovie(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "closing current movie");
        self.action(id, "makemovie").await
    }

    /// `GET /{id}/action/snapshot`
    pub async fn action_snapshot(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "taking snapshot");
        self.action(id, "snapshot").await
    }

    async fn action(&mut self, id: &str, action: &str) -> Result<String, Error> {
        let (body, _) = self.request(&format!("/{id}/action/{action}")).await?;
        Ok(body)
    }
}
