/// Camera session: live preview polling and photo capture
///
/// The device sits behind `CaptureBackend` / `FrameSource` so the session's
/// open/poll/capture/close rules hold regardless of which driver delivers
/// the pixels.
use chrono::{DateTime, Local, TimeZone};
use image::{imageops, RgbImage, RgbaImage};
use std::path::PathBuf;

use crate::config::{PHOTO_EXTENSION, PHOTO_PREFIX};
use crate::error::{LauncherError, Result};

/// Row order of a frame's pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    TopDown,
    /// First row in the buffer is the bottom of the picture
    BottomUp,
}

/// One frame as read from the device
#[derive(Debug, Clone)]
pub struct Frame {
    pub pixels: RgbImage,
    pub row_order: RowOrder,
}

impl Frame {
    /// Pixels with the first row at the top
    pub fn upright(self) -> RgbImage {
        match self.row_order {
            RowOrder::TopDown => self.pixels,
            RowOrder::BottomUp => imageops::flip_vertical(&self.pixels),
        }
    }
}

/// Frame converted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA8, top row first
    pub pixels: Vec<u8>,
}

impl From<Frame> for PreviewFrame {
    fn from(frame: Frame) -> Self {
        let rgba: RgbaImage = image::DynamicImage::ImageRgb8(frame.upright()).to_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        }
    }
}

/// An opened capture device
pub trait FrameSource {
    /// Blocking read of the next frame
    fn read_frame(&mut self) -> Result<Frame>;
}

/// Opens the default capture device
pub trait CaptureBackend {
    fn open_default(&self) -> Result<Box<dyn FrameSource>>;
}

/// Photo written by `CameraSession::capture`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub path: PathBuf,
}

/// File name for a capture taken at `when`: `photo_YYYYMMDD_HHMMSS.png`.
///
/// Resolution is one second, so two captures in the same second share a name
/// and the later one replaces the earlier file.
pub fn photo_file_name<Tz: TimeZone>(when: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}.{}",
        PHOTO_PREFIX,
        when.format("%Y%m%d_%H%M%S"),
        PHOTO_EXTENSION
    )
}

/// Live camera stream owned by the camera screen
pub struct CameraSession {
    backend: Box<dyn CaptureBackend>,
    source: Option<Box<dyn FrameSource>>,
    photo_dir: PathBuf,
}

impl CameraSession {
    pub fn new(backend: Box<dyn CaptureBackend>, photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            source: None,
            photo_dir: photo_dir.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Acquire the default capture device. Already open is fine.
    pub fn open(&mut self) -> Result<()> {
        if self.source.is_some() {
            return Ok(());
        }
        let source = self.backend.open_default()?;
        self.source = Some(source);
        tracing::info!("📷 camera opened");
        Ok(())
    }

    /// Read one preview frame.
    ///
    /// Returns `None` when the camera is closed or has no frame right now; the
    /// caller keeps showing the previous frame.
    pub fn poll_frame(&mut self) -> Option<PreviewFrame> {
        let source = self.source.as_mut()?;
        match source.read_frame() {
            Ok(frame) => Some(PreviewFrame::from(frame)),
            Err(e) => {
                tracing::trace!("preview frame skipped: {}", e);
                None
            }
        }
    }

    /// Read a fresh frame and write it to the photo folder as PNG
    pub fn capture(&mut self) -> Result<CapturedPhoto> {
        self.capture_at(&Local::now())
    }

    pub fn capture_at<Tz: TimeZone>(&mut self, when: &DateTime<Tz>) -> Result<CapturedPhoto>
    where
        Tz::Offset: std::fmt::Display,
    {
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| LauncherError::camera("camera is not open"))?;
        let frame = source.read_frame()?;

        let path = self.photo_dir.join(photo_file_name(when));
        frame
            .upright()
            .save_with_format(&path, image::ImageFormat::Png)?;

        tracing::info!("📸 Photo saved: {}", path.display());
        Ok(CapturedPhoto { path })
    }

    /// Release the device. Safe when never opened.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            tracing::info!("camera released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("open", &self.is_open())
            .field("photo_dir", &self.photo_dir)
            .finish()
    }
}

/// Default webcam through nokhwa
pub mod native {
    use super::*;
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use nokhwa::Camera;

    pub struct NokhwaBackend;

    impl CaptureBackend for NokhwaBackend {
        fn open_default(&self) -> Result<Box<dyn FrameSource>> {
            let format =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
            let mut camera =
                Camera::new(CameraIndex::Index(0), format).map_err(LauncherError::camera)?;
            camera.open_stream().map_err(LauncherError::camera)?;
            Ok(Box::new(NokhwaSource { camera }))
        }
    }

    struct NokhwaSource {
        camera: Camera,
    }

    impl FrameSource for NokhwaSource {
        fn read_frame(&mut self) -> Result<Frame> {
            let buffer = self
                .camera
                .frame()
                .map_err(|_| LauncherError::FrameUnavailable)?;
            let decoded = buffer
                .decode_image::<RgbFormat>()
                .map_err(|_| LauncherError::FrameUnavailable)?;

            let (width, height) = (decoded.width(), decoded.height());
            let pixels = RgbImage::from_raw(width, height, decoded.into_raw())
                .ok_or(LauncherError::FrameUnavailable)?;

            Ok(Frame {
                pixels,
                row_order: RowOrder::TopDown,
            })
        }
    }

    impl Drop for NokhwaSource {
        fn drop(&mut self) {
            if let Err(e) = self.camera.stop_stream() {
                tracing::warn!("camera stop failed: {}", e);
            }
        }
    }
}
