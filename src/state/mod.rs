/// State management module
///
/// This module holds the state behind each screen:
/// - Screen table and navigation (registry.rs)
/// - Home screen icons (menu.rs)
/// - Calculator expression buffer (calculator.rs)
/// - Clock samples (clock.rs)
/// - Photo folder listing (gallery.rs)

pub mod calculator;
pub mod clock;
pub mod gallery;
pub mod menu;
pub mod registry;
