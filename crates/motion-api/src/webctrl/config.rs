// Webcontrol configuration endpoints
//
// Listing, mutating and persisting `motion.conf` / camera configs. Motion
// writes every config file in a single call, there is no per-thread write.

use tracing::debug;
use url::form_urlencoded;

use crate::error::Error;
use crate::webctrl::GLOBAL_ID;
use crate::webctrl::client::HttpClient;

impl HttpClient {
    /// List the configuration of thread `id`.
    ///
    /// `GET /{id}/config/list`
    pub async fn config_list(&mut self, id: &str) -> Result<String, Error> {
        debug!(id, "listing config");
        let (body, _) = self.request(&format!("/{id}/config/list")).await?;
        Ok(body)
    }

    /// Set `key` to its wire representation `value` on thread `id`.
    ///
    /// `GET /{id}/config/set?{key}={value}`
    pub async fn config_set(&mut self, id: &str, key: &str, value: &str) -> Result<String, Error> {
        debug!(id, key, value, "setting config");
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        let (body, _) = self.request(&format!("/{id}/config/set?{query}")).await?;
        Ok(body)
    }

    /// Persist every configuration to disk.
    ///
    /// `GET /0/config/writeyes`
    pub async fn config_write(&mut self) -> Result<String, Error> {
        debug!("writing config to disk");
        let (body, _) = self.request(&format!("/{GLOBAL_ID}/config/writeyes")).await?;
        Ok(body)
    }
}
