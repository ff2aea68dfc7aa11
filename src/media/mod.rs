/// Live device sessions
///
/// - `audio.rs` - microphone to speaker passthrough (cpal)
/// - `camera.rs` - webcam preview and photo capture (nokhwa)

pub mod audio;
pub mod camera;
