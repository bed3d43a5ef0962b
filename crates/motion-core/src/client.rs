// ── Motion client facade ──
//
// One `MotionClient` per daemon. Owns the webctrl transport, the camera
// handles and the cached config tables, and tracks which changes still need
// a write-to-disk or a thread restart. Every operation takes `&mut self`, so
// a single owner drives the daemon; hosts that share a client wrap it in a
// `tokio::sync::Mutex`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use motion_api::{Endpoint, GLOBAL_ID, HttpClient, Scheme, TlsMode};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::schema::{self, keys};
use crate::model::{
    Camera, CameraEvent, CameraFactory, ConfigTable, DaemonVersion, Features, Param, ParamInput,
    build_value, default_camera_factory,
};
use crate::parse::{self, ResponseShape};

const EVENT_CHANNEL_SIZE: usize = 64;
const DEFAULT_STREAM_PORT: u16 = 8081;

static EMPTY_TABLE: LazyLock<ConfigTable> = LazyLock::new(ConfigTable::new);

// ── ClientState ──────────────────────────────────────────────────

/// Lifecycle of the cached inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Never refreshed, or the last refresh failed after clearing the cache.
    Uninitialized,
    Updating,
    Ready,
}

#[derive(Debug, Clone, Copy)]
enum Detection {
    Start,
    Pause,
}

impl Detection {
    fn paused_after(self, response: &str) -> bool {
        match self {
            Self::Start => parse::paused_after_start(response),
            Self::Pause => parse::paused_after_pause(response),
        }
    }
}

// ── MotionClient ─────────────────────────────────────────────────

pub struct MotionClient {
    api: HttpClient,
    state: ClientState,
    description: Option<String>,
    version: DaemonVersion,
    features: Features,
    configs: IndexMap<String, ConfigTable>,
    cameras: IndexMap<String, Camera>,
    config_dirty: bool,
    need_restart: BTreeSet<String>,
    camera_factory: CameraFactory,
    event_tx: broadcast::Sender<CameraEvent>,
}

impl MotionClient {
    /// Create a client with its own HTTP session. Does NOT connect; call
    /// [`refresh()`](Self::refresh) to load the inventory.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let api = HttpClient::new(config.endpoint(), config.credentials(), &config.transport())?;
        Ok(Self::from_api(api))
    }

    /// Create a client over a shared `reqwest::Client`, left open by `close()`.
    pub fn with_session(config: &ClientConfig, http: reqwest::Client) -> Self {
        let api = HttpClient::with_client(
            http,
            config.endpoint(),
            config.credentials(),
            &config.transport(),
        );
        Self::from_api(api)
    }

    fn from_api(api: HttpClient) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            api,
            state: ClientState::Uninitialized,
            description: None,
            version: DaemonVersion::default(),
            features: Features::default(),
            configs: IndexMap::new(),
            cameras: IndexMap::new(),
            config_dirty: false,
            need_restart: BTreeSet::new(),
            camera_factory: default_camera_factory(),
            event_tx,
        }
    }

    /// Replace the factory used for cameras discovered by later refreshes.
    pub fn with_camera_factory(mut self, factory: CameraFactory) -> Self {
        self.camera_factory = factory;
        self
    }

    // ── Descriptors ──────────────────────────────────────────────

    pub fn endpoint(&self) -> &Endpoint {
        self.api.endpoint()
    }

    pub fn host(&self) -> &str {
        self.api.endpoint().host()
    }

    pub fn port(&self) -> u16 {
        self.api.endpoint().port()
    }

    pub fn tls_mode(&self) -> TlsMode {
        self.api.tls_mode()
    }

    /// `{host}_{port}`.
    pub fn unique_id(&self) -> String {
        self.api.endpoint().unique_id()
    }

    /// Display name, `motion@{host}`.
    pub fn name(&self) -> String {
        format!("motion@{}", self.host())
    }

    /// Banner from the root page (html title or first plaintext line).
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> &DaemonVersion {
        &self.version
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    /// `false` while the transport is cooling down after a failure.
    pub fn is_available(&self) -> bool {
        self.api.is_available()
    }

    /// Webctrl base url with the scheme currently in use.
    pub fn server_url(&self) -> String {
        self.api.server_url()
    }

    /// Base url of the global stream server.
    pub fn stream_url(&self) -> String {
        let global = self.config();
        let port = global
            .get(keys::STREAM_PORT)
            .and_then(Param::as_i64)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p != 0)
            .unwrap_or(DEFAULT_STREAM_PORT);
        self.endpoint().url_on_port(port, stream_scheme(global))
    }

    // ── Cached state ─────────────────────────────────────────────

    /// Global (thread 0) config table.
    pub fn config(&self) -> &ConfigTable {
        self.config_for(GLOBAL_ID)
    }

    /// Config table for `id`; empty if unknown.
    pub fn config_for(&self, id: &str) -> &ConfigTable {
        self.configs.get(id).unwrap_or(&EMPTY_TABLE)
    }

    /// Every cached table keyed by internal id, global first.
    pub fn configs(&self) -> impl Iterator<Item = (&str, &ConfigTable)> {
        self.configs.iter().map(|(id, table)| (id.as_str(), table))
    }

    pub fn config_is_dirty(&self) -> bool {
        self.config_dirty
    }

    /// Ids whose changed options wait for a thread restart.
    pub fn pending_restarts(&self) -> impl Iterator<Item = &str> {
        self.need_restart.iter().map(String::as_str)
    }

    pub fn camera(&self, id: &str) -> Option<CameraView<'_>> {
        self.cameras
            .get(id)
            .map(|camera| CameraView { client: self, camera })
    }

    /// Cameras in inventory order.
    pub fn cameras(&self) -> impl Iterator<Item = CameraView<'_>> {
        self.cameras
            .values()
            .map(move |camera| CameraView { client: self, camera })
    }

    /// Look up a camera by its configured `camera_id`.
    pub fn camera_by_camera_id(&self, camera_id: &str) -> Option<CameraView<'_>> {
        self.cameras().find(|c| c.camera_id() == camera_id)
    }

    /// Mutable access to a handle, e.g. to attach a listener.
    pub fn camera_mut(&mut self, id: &str) -> Option<&mut Camera> {
        self.cameras.get_mut(id)
    }

    /// Subscribe to camera state changes across every camera.
    pub fn events(&self) -> broadcast::Receiver<CameraEvent> {
        self.event_tx.subscribe()
    }

    /// Close the owned HTTP session; later requests fail.
    pub fn close(&mut self) {
        self.api.close();
    }

    // ── Inventory ────────────────────────────────────────────────

    /// Reload the camera inventory and every config table.
    ///
    /// Existing camera handles are dropped and rebuilt through the camera
    /// factory. With `with_status`, connection and detection state are
    /// polled afterwards.
    pub async fn refresh(&mut self, with_status: bool) -> Result<(), CoreError> {
        let previous = self.state;
        self.state = ClientState::Updating;

        let body = match self.api.root().await {
            Ok(body) => body,
            Err(e) => {
                self.state = previous;
                return Err(e.into());
            }
        };

        self.cameras.clear();
        self.configs.clear();
        if let Err(e) = self.load_inventory(&body).await {
            self.state = ClientState::Uninitialized;
            return Err(e);
        }
        self.state = ClientState::Ready;

        info!(
            endpoint = %self.endpoint(),
            version = %self.version,
            cameras = self.cameras.len(),
            "inventory refreshed"
        );

        if with_status {
            self.detection_status(GLOBAL_ID).await;
        }
        Ok(())
    }

    async fn load_inventory(&mut self, body: &str) -> Result<(), CoreError> {
        let global = self.config_list(GLOBAL_ID).await?;
        self.configs.insert(GLOBAL_ID.to_owned(), global);

        let inventory = parse::parse_inventory(body);
        for id in &inventory.camera_ids {
            let table = self.config_list(id).await?;
            self.configs.insert(id.clone(), table);
            let camera = (self.camera_factory)(self.api.endpoint(), id);
            self.cameras.insert(id.clone(), camera);
        }

        if inventory.description.is_some() {
            self.description = inventory.description;
        }
        if let Some(version) = inventory.version {
            self.version = version;
        }

        // Feature detection keys off a config option rather than the
        // version string; webcontrol_tls, /{id}/stream and global actions
        // all arrived in 4.2.
        let tls = self.config().contains_key(keys::WEBCONTROL_TLS);
        self.features = Features {
            webhtml: inventory.shape == ResponseShape::Html,
            tls,
            advanced_stream: tls,
            global_actions: tls,
        };
        debug!(features = ?self.features, "daemon features");
        Ok(())
    }

    /// Fetch and parse `/{id}/config/list` (does not touch the cache).
    pub async fn config_list(&mut self, id: &str) -> Result<ConfigTable, CoreError> {
        let body = self.api.config_list(id).await?;
        Ok(parse::parse_config_list(&body))
    }

    // ── Detection ────────────────────────────────────────────────

    /// Poll connection and detection state and update camera handles.
    ///
    /// Best effort: failures are logged, never returned.
    pub async fn detection_status(&mut self, id: &str) {
        if let Err(e) = self.poll_detection(id).await {
            info!(id, error = %e, "detection status poll failed");
        }
    }

    async fn poll_detection(&mut self, id: &str) -> Result<(), CoreError> {
        let body = self.api.detection_connection(id).await?;
        for (camera_id, connected) in parse::parse_connection_status(&body) {
            self.update_by_camera_id(&camera_id, |c| c.set_connected(connected));
        }

        let body = if id != GLOBAL_ID || self.features.global_actions {
            self.api.detection_status(id).await?
        } else {
            // Legacy webctrl can't report every camera from thread 0.
            let mut combined = String::new();
            for cam in self.camera_ids() {
                match self.api.detection_status(&cam).await {
                    Ok(part) => combined.push_str(&part),
                    Err(e) => warn!(id = %cam, error = %e, "detection status failed"),
                }
            }
            combined
        };
        for (camera_id, paused) in parse::parse_detection_status(&body) {
            self.update_by_camera_id(&camera_id, |c| c.set_paused(paused));
        }
        Ok(())
    }

    /// Resume detection for one camera, or all with [`GLOBAL_ID`].
    pub async fn detection_start(&mut self, id: &str) {
        self.detection(id, Detection::Start).await;
    }

    /// Pause detection for one camera, or all with [`GLOBAL_ID`].
    pub async fn detection_pause(&mut self, id: &str) {
        self.detection(id, Detection::Pause).await;
    }

    async fn detection(&mut self, id: &str, command: Detection) {
        if id != GLOBAL_ID || self.features.global_actions {
            self.send_detection(id, command).await;
        } else {
            for cam in self.camera_ids() {
                self.send_detection(&cam, command).await;
            }
        }
    }

    async fn send_detection(&mut self, id: &str, command: Detection) {
        let result = match command {
            Detection::Start => self.api.detection_start(id).await,
            Detection::Pause => self.api.detection_pause(id).await,
        };
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(id, ?command, error = %e, "detection command failed");
                return;
            }
        };

        let paused = command.paused_after(&response);
        if id == GLOBAL_ID {
            let events: Vec<CameraEvent> = self
                .cameras
                .values_mut()
                .filter_map(|c| c.set_paused(paused))
                .collect();
            for event in events {
                self.publish(event);
            }
        } else if let Some(camera) = self.cameras.get_mut(id) {
            if let Some(event) = camera.set_paused(paused) {
                self.publish(event);
            }
        } else {
            warn!(id, "detection command for unknown camera");
        }
    }

    /// Request a pause state for one camera; no request when already there.
    pub async fn set_camera_paused(&mut self, id: &str, paused: bool) -> Result<(), CoreError> {
        let current = self
            .cameras
            .get(id)
            .ok_or_else(|| CoreError::CameraNotFound { id: id.to_owned() })?
            .paused();
        if current != paused {
            if paused {
                self.detection_pause(id).await;
            } else {
                self.detection_start(id).await;
            }
        }
        Ok(())
    }

    // ── Configuration ────────────────────────────────────────────

    /// Set `key` on the daemon for `id` (a camera, or [`GLOBAL_ID`]).
    ///
    /// Unless `force`, a value equal to the cached one is a no-op. A global
    /// set propagates into every cached table that already has the key.
    /// With `persist` the daemon writes its config files right away.
    pub async fn config_set(
        &mut self,
        key: &str,
        value: impl Into<ParamInput>,
        id: &str,
        force: bool,
        persist: bool,
    ) -> Result<(), CoreError> {
        let value = value.into();

        if !force {
            let current = self
                .configs
                .get(id)
                .filter(|table| !table.is_empty())
                .and_then(|table| table.get(key));
            if current.is_some_and(|c| *c == value) {
                debug!(id, key, "config value unchanged, not sent");
                return Ok(());
            }
        }

        let typed = build_value(key, value.clone());
        let wire = typed
            .as_ref()
            .map_or_else(|| value.to_wire(), ToString::to_string);
        self.api.config_set(id, key, &wire).await?;

        if id == GLOBAL_ID {
            for table in self.configs.values_mut() {
                if table.contains_key(key) {
                    table.insert(key, typed.clone());
                }
            }
        } else if let Some(table) = self.configs.get_mut(id).filter(|t| !t.is_empty()) {
            table.insert(key, typed);
        }

        self.config_dirty = true;
        if schema::requires_restart(key) {
            self.need_restart.insert(id.to_owned());
        }
        debug!(id, key, value = %wire, "config value set");

        if persist {
            self.config_write().await?;
        }
        Ok(())
    }

    /// Ask the daemon to write every config file to disk.
    pub async fn config_write(&mut self) -> Result<(), CoreError> {
        self.api.config_write().await?;
        self.config_dirty = false;
        Ok(())
    }

    /// Restart a camera thread, or the whole daemon with [`GLOBAL_ID`].
    pub async fn restart(&mut self, id: &str) -> Result<(), CoreError> {
        self.api.action_restart(id).await?;
        if id == GLOBAL_ID {
            self.need_restart.clear();
        } else {
            self.need_restart.remove(id);
        }
        Ok(())
    }

    /// Write pending changes and restart whatever needs it: the daemon as a
    /// whole if a global option changed, otherwise each affected camera.
    pub async fn sync_config(&mut self) -> Result<(), CoreError> {
        if !self.config_dirty {
            return Ok(());
        }
        self.config_write().await?;
        if self.need_restart.contains(GLOBAL_ID) {
            self.restart(GLOBAL_ID).await?;
        } else {
            let pending: Vec<String> = self.need_restart.iter().cloned().collect();
            for id in pending {
                self.restart(&id).await?;
            }
        }
        Ok(())
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Close the current movie and start a new one.
    pub async fn makemovie(&mut self, id: &str) -> Result<(), CoreError> {
        self.api.action_makemovie(id).await?;
        Ok(())
    }

    pub async fn snapshot(&mut self, id: &str) -> Result<(), CoreError> {
        self.api.action_snapshot(id).await?;
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn camera_ids(&self) -> Vec<String> {
        self.cameras.keys().cloned().collect()
    }

    fn camera_id_of(&self, id: &str) -> String {
        camera_id_in(self.config_for(id), id)
    }

    /// Apply a status update reported under a `camera_id` label.
    fn update_by_camera_id(
        &mut self,
        camera_id: &str,
        update: impl FnOnce(&mut Camera) -> Option<CameraEvent>,
    ) {
        let found = self
            .cameras
            .keys()
            .find(|id| self.camera_id_of(id) == camera_id)
            .cloned();
        let Some(id) = found else {
            warn!(camera_id, "status reported for unknown camera");
            return;
        };
        let event = self.cameras.get_mut(&id).and_then(update);
        if let Some(event) = event {
            self.publish(event);
        }
    }

    fn publish(&self, event: CameraEvent) {
        debug!(?event, "camera state changed");
        // No receivers is fine.
        let _ = self.event_tx.send(event);
    }
}

fn camera_id_in(table: &ConfigTable, id: &str) -> String {
    table
        .get(keys::CAMERA_ID)
        .map_or_else(|| id.to_owned(), ToString::to_string)
}

fn stream_scheme(table: &ConfigTable) -> Scheme {
    if table.get(keys::STREAM_TLS).is_some_and(Param::is_truthy) {
        Scheme::Https
    } else {
        Scheme::Http
    }
}

// ── CameraView ───────────────────────────────────────────────────

/// A camera together with the client state its derived values depend on.
#[derive(Clone, Copy)]
pub struct CameraView<'a> {
    client: &'a MotionClient,
    camera: &'a Camera,
}

impl<'a> CameraView<'a> {
    pub fn handle(&self) -> &'a Camera {
        self.camera
    }

    /// Internal (thread) id.
    pub fn id(&self) -> &'a str {
        self.camera.id()
    }

    /// Configured `camera_id`, or the internal id when not set.
    pub fn camera_id(&self) -> String {
        camera_id_in(self.config(), self.id())
    }

    pub fn connected(&self) -> bool {
        self.camera.connected()
    }

    pub fn paused(&self) -> bool {
        self.camera.paused()
    }

    pub fn config(&self) -> &'a ConfigTable {
        self.client.config_for(self.id())
    }

    /// `camera_name` if configured.
    pub fn name(&self) -> Option<&'a str> {
        self.config().get(keys::CAMERA_NAME).map(Param::as_str)
    }

    /// Webctrl base url for this camera.
    pub fn config_url(&self) -> String {
        format!("{}/{}", self.client.server_url(), self.id())
    }

    fn own_stream_base(&self) -> Option<String> {
        let config = self.config();
        let port = config
            .get(keys::STREAM_PORT)
            .and_then(Param::as_i64)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p != 0)?;
        Some(
            self.client
                .endpoint()
                .url_on_port(port, stream_scheme(config)),
        )
    }

    /// MJPEG stream url: the camera's own stream port if it has one,
    /// otherwise the path on the global stream server.
    pub fn stream_url(&self) -> String {
        self.own_stream_base().unwrap_or_else(|| {
            format!("{}/{}/stream", self.client.stream_url(), self.id())
        })
    }

    /// Latest still image; daemons before 4.2 have no such endpoint.
    pub fn image_url(&self) -> Option<String> {
        if !self.client.features.advanced_stream {
            return None;
        }
        Some(self.own_stream_base().map_or_else(
            || format!("{}/{}/current", self.client.stream_url(), self.id()),
            |base| format!("{base}/current"),
        ))
    }

    /// `(username, password)` for the stream server, camera first then
    /// global. Empty strings when neither defines one.
    pub fn stream_authentication(&self) -> (String, String) {
        let value = [self.config(), self.client.config()]
            .into_iter()
            .filter_map(|table| table.get(keys::STREAM_AUTHENTICATION))
            .find(|p| p.is_truthy())
            .map_or(":", Param::as_str);
        match value.split_once(':') {
            Some((user, pass)) => (user.to_owned(), pass.to_owned()),
            None => (value.to_owned(), String::new()),
        }
    }
}

impl std::fmt::Debug for CameraView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraView")
            .field("id", &self.id())
            .field("camera_id", &self.camera_id())
            .field("connected", &self.connected())
            .field("paused", &self.paused())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MotionClient {
        MotionClient::with_session(&ClientConfig::new("cam.local", 8080), reqwest::Client::new())
    }

    fn table(pairs: &[(&str, &str)]) -> ConfigTable {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), build_value(k, *v)))
            .collect()
    }

    fn with_camera(mut client: MotionClient, id: &str, config: ConfigTable) -> MotionClient {
        client.features.advanced_stream = true;
        client.configs.insert(id.to_owned(), config);
        client.cameras.insert(id.to_owned(), Camera::new(id));
        client
    }

    #[test]
    fn descriptors() {
        let client = client();
        assert_eq!(client.name(), "motion@cam.local");
        assert_eq!(client.unique_id(), "cam.local_8080");
        assert_eq!(client.server_url(), "http://cam.local:8080");
        assert_eq!(client.state(), ClientState::Uninitialized);
        assert!(client.description().is_none());
        assert_eq!(client.stream_url(), "http://cam.local:8081");
    }

    #[test]
    fn global_stream_url_follows_config() {
        let mut client = client();
        client.configs.insert(
            GLOBAL_ID.into(),
            table(&[("stream_port", "9000"), ("stream_tls", "on")]),
        );
        assert_eq!(client.stream_url(), "https://cam.local:9000");
    }

    #[test]
    fn camera_with_own_stream_port() {
        let client = with_camera(
            client(),
            "1",
            table(&[("stream_port", "8082"), ("stream_tls", "off")]),
        );
        let cam = client.camera("1").expect("camera 1");
        assert_eq!(cam.stream_url(), "http://cam.local:8082");
        assert_eq!(cam.image_url().as_deref(), Some("http://cam.local:8082/current"));
        assert_eq!(cam.config_url(), "http://cam.local:8080/1");
    }

    #[test]
    fn camera_without_stream_port_uses_global_server() {
        let client = with_camera(client(), "2", table(&[("stream_port", "0")]));
        let cam = client.camera("2").expect("camera 2");
        assert_eq!(cam.stream_url(), "http://cam.local:8081/2/stream");
        assert_eq!(cam.image_url().as_deref(), Some("http://cam.local:8081/2/current"));
    }

    #[test]
    fn legacy_daemon_has_no_image_url() {
        let mut client = with_camera(client(), "1", table(&[("stream_port", "8082")]));
        client.features.advanced_stream = false;
        let cam = client.camera("1").expect("camera 1");
        assert!(cam.image_url().is_none());
        assert_eq!(cam.stream_url(), "http://cam.local:8082");
    }

    #[test]
    fn camera_id_falls_back_to_internal_id() {
        let client = with_camera(client(), "1", table(&[("camera_id", "101")]));
        let client = with_camera(client, "2", table(&[("camera_id", "(not defined)")]));
        assert_eq!(client.camera("1").map(|c| c.camera_id()).as_deref(), Some("101"));
        assert_eq!(client.camera("2").map(|c| c.camera_id()).as_deref(), Some("2"));
        assert_eq!(client.camera_by_camera_id("101").map(|c| c.id()), Some("1"));
        assert!(client.camera_by_camera_id("1").is_none());
    }

    #[test]
    fn stream_authentication_prefers_camera_then_global() {
        let mut client = with_camera(client(), "1", table(&[("stream_authentication", "cam:pw")]));
        client = with_camera(client, "2", ConfigTable::new());
        client.configs.insert(
            GLOBAL_ID.into(),
            table(&[("stream_authentication", "admin:secret")]),
        );
        let auth = |id: &str| client.camera(id).map(|c| c.stream_authentication());
        assert_eq!(auth("1"), Some(("cam".into(), "pw".into())));
        assert_eq!(auth("2"), Some(("admin".into(), "secret".into())));
    }

    #[test]
    fn stream_authentication_defaults_to_empty_pair() {
        let client = with_camera(client(), "1", ConfigTable::new());
        let cam = client.camera("1").expect("camera 1");
        assert_eq!(cam.stream_authentication(), (String::new(), String::new()));
    }

    #[test]
    fn status_updates_route_through_camera_id_and_broadcast() {
        let mut client = with_camera(client(), "1", table(&[("camera_id", "101")]));
        let mut events = client.events();

        client.update_by_camera_id("101", |c| c.set_connected(true));
        client.update_by_camera_id("101", |c| c.set_connected(true));
        client.update_by_camera_id("1", |c| c.set_connected(false));

        assert!(client.camera("1").is_some_and(|c| c.connected()));
        assert_eq!(
            events.try_recv().ok(),
            Some(CameraEvent::ConnectedChanged {
                id: "1".into(),
                connected: true
            })
        );
        assert!(events.try_recv().is_err());
    }
}
