/// Home screen menu entries
use super::registry::{Screen, ScreenRegistry};
use crate::error::Result;

/// One icon button on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    /// Icon file name inside the assets folder
    pub icon: &'static str,
    pub label: &'static str,
    pub target: Screen,
}

/// The launcher's icons, top to bottom.
/// Two icons open the gallery (a "files" and a "gallery" icon).
pub const HOME_MENU: [MenuEntry; 6] = [
    MenuEntry { icon: "calc.png", label: "Calculator", target: Screen::Calculator },
    MenuEntry { icon: "camera.png", label: "Camera", target: Screen::Camera },
    MenuEntry { icon: "files.png", label: "Gallery", target: Screen::Gallery },
    MenuEntry { icon: "gallery.png", label: "Gallery", target: Screen::Gallery },
    MenuEntry { icon: "clock.png", label: "Clock", target: Screen::Clock },
    MenuEntry { icon: "mic.png", label: "Mic", target: Screen::Mic },
];

/// Static list of home screen entries
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeMenu;

impl HomeMenu {
    pub fn entries(&self) -> &'static [MenuEntry] {
        &HOME_MENU
    }

    /// Check at startup that every icon leads to a screen registered under its name
    pub fn validate(&self, registry: &ScreenRegistry) -> Result<()> {
        for entry in self.entries() {
            registry.resolve(entry.target.name())?;
        }
        Ok(())
    }
}
