/// Screen views
///
/// One `view` function per screen. Views only read state; every interaction
/// is sent back to `Launcher::update` as a `Message`.

pub mod calculator;
pub mod camera;
pub mod clock;
pub mod gallery;
pub mod home;
pub mod mic;

use std::path::PathBuf;

/// Folder holding icons and backgrounds
const ASSETS_DIR: &str = "assets";

/// Path of a bundled image
pub fn asset(name: &str) -> PathBuf {
    PathBuf::from(ASSETS_DIR).join(name)
}
