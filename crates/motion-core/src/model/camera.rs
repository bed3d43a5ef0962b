// ── Camera handle ──
//
// Per-camera connection and pause state as last reported by the daemon.
// Listeners hear about each actual transition exactly once.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use motion_api::Endpoint;

/// A change in a camera's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraEvent {
    ConnectedChanged { id: String, connected: bool },
    PausedChanged { id: String, paused: bool },
}

impl CameraEvent {
    /// Internal id of the camera the event refers to.
    pub fn camera(&self) -> &str {
        match self {
            Self::ConnectedChanged { id, .. } | Self::PausedChanged { id, .. } => id,
        }
    }
}

/// Receives state transitions for one camera.
pub trait CameraListener: Send + Sync {
    fn on_camera_event(&self, camera: &Camera, event: &CameraEvent);
}

impl<F> CameraListener for F
where
    F: Fn(&Camera, &CameraEvent) + Send + Sync,
{
    fn on_camera_event(&self, camera: &Camera, event: &CameraEvent) {
        self(camera, event);
    }
}

/// Builds the handle for a camera discovered during refresh.
pub type CameraFactory = Arc<dyn Fn(&Endpoint, &str) -> Camera + Send + Sync>;

pub fn default_camera_factory() -> CameraFactory {
    Arc::new(|_: &Endpoint, id: &str| Camera::new(id))
}

/// Handle for one camera thread of the daemon.
///
/// Starts disconnected and unpaused until the first status poll says
/// otherwise.
pub struct Camera {
    id: String,
    connected: bool,
    paused: bool,
    listeners: Vec<Arc<dyn CameraListener>>,
}

impl Camera {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            connected: false,
            paused: false,
            listeners: Vec::new(),
        }
    }

    /// Builder form of [`subscribe`](Self::subscribe).
    pub fn with_listener(mut self, listener: Arc<dyn CameraListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn subscribe(&mut self, listener: Arc<dyn CameraListener>) {
        self.listeners.push(listener);
    }

    /// Internal (thread) id, as used in webctrl urls.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Record a new connection state; returns the event if it changed.
    pub(crate) fn set_connected(&mut self, connected: bool) -> Option<CameraEvent> {
        if self.connected == connected {
            return None;
        }
        self.connected = connected;
        Some(self.notify(CameraEvent::ConnectedChanged {
            id: self.id.clone(),
            connected,
        }))
    }

    /// Record a new pause state; returns the event if it changed.
    pub(crate) fn set_paused(&mut self, paused: bool) -> Option<CameraEvent> {
        if self.paused == paused {
            return None;
        }
        self.paused = paused;
        Some(self.notify(CameraEvent::PausedChanged {
            id: self.id.clone(),
            paused,
        }))
    }

    fn notify(&self, event: CameraEvent) -> CameraEvent {
        for listener in &self.listeners {
            listener.on_camera_event(self, &event);
        }
        event
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("id", &self.id)
            .field("connected", &self.connected)
            .field("paused", &self.paused)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<CameraEvent>>>, Arc<dyn CameraListener>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: Arc<dyn CameraListener> = Arc::new(move |_: &Camera, e: &CameraEvent| {
            sink.lock().expect("not poisoned").push(e.clone());
        });
        (seen, listener)
    }

    #[test]
    fn notifies_once_per_transition() {
        let (seen, listener) = recorder();
        let mut camera = Camera::new("1").with_listener(listener);

        assert!(camera.set_connected(true).is_some());
        assert!(camera.set_connected(true).is_none());
        assert!(camera.set_paused(false).is_none());
        assert!(camera.set_paused(true).is_some());

        let seen = seen.lock().expect("not poisoned");
        assert_eq!(
            *seen,
            vec![
                CameraEvent::ConnectedChanged {
                    id: "1".into(),
                    connected: true
                },
                CameraEvent::PausedChanged {
                    id: "1".into(),
                    paused: true
                },
            ]
        );
    }

    #[test]
    fn listener_sees_updated_state() {
        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        let mut camera = Camera::new("2");
        camera.subscribe(Arc::new(move |c: &Camera, _: &CameraEvent| {
            *sink.lock().expect("not poisoned") = Some(c.paused());
        }));

        camera.set_paused(true);
        assert_eq!(*observed.lock().expect("not poisoned"), Some(true));
    }

    #[test]
    fn default_factory_builds_idle_camera() {
        let factory = default_camera_factory();
        let camera = factory(&Endpoint::new("localhost", 8080), "3");
        assert_eq!(camera.id(), "3");
        assert!(!camera.connected());
        assert!(!camera.paused());
    }
}
