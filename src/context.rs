/// Application context: every mini-app's state, owned in one place
///
/// The screen registry drives this context through `ScreenLifecycle`, so
/// device sessions open and close with their screens.
use std::sync::Arc;

use crate::config::LauncherConfig;
use crate::media::audio::{AudioBackend, MicSession};
use crate::media::camera::{CameraSession, CaptureBackend, PreviewFrame};
use crate::state::calculator::Calculator;
use crate::state::clock::ClockTicker;
use crate::state::gallery::{GalleryEntry, GalleryIndex, GalleryVisit};
use crate::state::registry::{Screen, ScreenLifecycle};

pub struct AppContext {
    pub config: LauncherConfig,
    pub calculator: Calculator,
    pub clock: ClockTicker,
    pub mic: MicSession,
    /// Last mic device error, shown under the buttons
    pub mic_status: Option<String>,
    pub camera: CameraSession,
    /// Last frame shown; kept when a poll returns nothing
    pub preview: Option<PreviewFrame>,
    pub camera_status: Option<String>,
    pub gallery: GalleryIndex,
    /// Listing taken when the gallery screen was last opened
    pub gallery_entries: Vec<GalleryEntry>,
    pub gallery_visit: GalleryVisit,
}

impl AppContext {
    pub fn new(
        config: LauncherConfig,
        audio: Arc<dyn AudioBackend>,
        capture: Box<dyn CaptureBackend>,
    ) -> Self {
        let mic = MicSession::new(audio, &config);
        let camera = CameraSession::new(capture, &config.photo_dir);
        let gallery = GalleryIndex::new(&config.photo_dir);

        Self {
            config,
            calculator: Calculator::new(),
            clock: ClockTicker::new(),
            mic,
            mic_status: None,
            camera,
            preview: None,
            camera_status: None,
            gallery,
            gallery_entries: Vec::new(),
            gallery_visit: GalleryVisit::default(),
        }
    }

    /// One preview tick: keep the old frame when the camera has none.
    /// Returns true when a new frame replaced it.
    pub fn poll_camera(&mut self) -> bool {
        match self.camera.poll_frame() {
            Some(frame) => {
                self.preview = Some(frame);
                true
            }
            None => false,
        }
    }

    pub fn capture_photo(&mut self) {
        self.camera_status = Some(match self.camera.capture() {
            Ok(photo) => format!("Photo saved: {}", photo.path.display()),
            Err(e) => {
                tracing::warn!("capture failed: {}", e);
                format!("Capture failed: {}", e)
            }
        });
    }

    /// Release every device before the app quits
    pub fn shutdown(&mut self) {
        self.mic.stop();
        self.camera.close();
    }
}

impl ScreenLifecycle for AppContext {
    fn on_enter(&mut self, screen: Screen) {
        match screen {
            Screen::Clock => {
                self.clock.tick();
            }
            Screen::Camera => {
                self.preview = None;
                self.camera_status = match self.camera.open() {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!("{}", e);
                        Some(e.to_string())
                    }
                };
            }
            Screen::Gallery => {
                self.gallery_visit.begin();
                self.gallery_entries = self.gallery.refresh();
            }
            Screen::Mic => {
                self.mic_status = None;
            }
            Screen::Home | Screen::Calculator => {}
        }
    }

    fn on_leave(&mut self, screen: Screen) {
        match screen {
            Screen::Camera => {
                self.camera.close();
                self.preview = None;
            }
            Screen::Mic => self.mic.stop(),
            Screen::Gallery => {
                self.gallery_visit.end();
                self.gallery_entries.clear();
            }
            Screen::Home | Screen::Calculator | Screen::Clock => {}
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("mic", &self.mic)
            .field("camera", &self.camera)
            .field("gallery_entries", &self.gallery_entries.len())
            .finish()
    }
}
