use std::collections::HashMap;
use std::fmt;

use crate::error::{LauncherError, Result};

/// Every screen the launcher can show
///
/// The set is closed: navigation works on these variants, and names only
/// matter when the screen table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Calculator,
    Clock,
    Mic,
    Camera,
    Gallery,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Home,
        Screen::Calculator,
        Screen::Clock,
        Screen::Mic,
        Screen::Camera,
        Screen::Gallery,
    ];

    /// Registration name of the screen
    pub fn name(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Calculator => "calculator",
            Screen::Clock => "clock",
            Screen::Mic => "mic",
            Screen::Camera => "camera",
            Screen::Gallery => "gallery",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Activation and deactivation hooks run by the registry on every switch
pub trait ScreenLifecycle {
    /// Called when `screen` becomes current
    fn on_enter(&mut self, screen: Screen);

    /// Called when `screen` stops being current, before the next one enters
    fn on_leave(&mut self, screen: Screen);
}

/// What the back signal did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// Returned to the home screen
    Handled,
    /// Already home: the application should quit
    ExitRequested,
}

/// Named table of mutually exclusive screens with exactly one current screen.
///
/// Starts on `Screen::Home`. The menu only lives on home and back always
/// returns home, so every path is home -> X -> home.
#[derive(Debug)]
pub struct ScreenRegistry {
    screens: HashMap<String, Screen>,
    current: Screen,
}

impl ScreenRegistry {
    /// Registry holding only the home screen, which is current
    pub fn new() -> Self {
        let mut screens = HashMap::new();
        screens.insert(Screen::Home.name().to_string(), Screen::Home);
        Self {
            screens,
            current: Screen::Home,
        }
    }

    /// Registry holding every screen under its canonical name
    pub fn with_all_screens() -> Result<Self> {
        let mut registry = Self::new();
        for screen in Screen::ALL.into_iter().filter(|s| *s != Screen::Home) {
            registry.register(screen.name(), screen)?;
        }
        Ok(registry)
    }

    /// Add `screen` under `name`. Names are unique.
    pub fn register(&mut self, name: &str, screen: Screen) -> Result<()> {
        if self.screens.contains_key(name) {
            return Err(LauncherError::DuplicateName(name.to_string()));
        }
        self.screens.insert(name.to_string(), screen);
        Ok(())
    }

    /// Look up a registered screen by name
    pub fn resolve(&self, name: &str) -> Result<Screen> {
        self.screens
            .get(name)
            .copied()
            .ok_or_else(|| LauncherError::UnknownScreen(name.to_string()))
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn is_home(&self) -> bool {
        self.current == Screen::Home
    }

    /// Make `target` current.
    ///
    /// The old screen's `on_leave` always finishes before the new screen's
    /// `on_enter` starts. Switching to the current screen runs no hooks.
    /// One side of every switch must be home.
    pub fn switch_to(&mut self, target: Screen, hooks: &mut impl ScreenLifecycle) -> Result<()> {
        if !self.screens.values().any(|s| *s == target) {
            return Err(LauncherError::UnknownScreen(target.name().to_string()));
        }
        if target == self.current {
            return Ok(());
        }
        if !self.is_home() && target != Screen::Home {
            return Err(LauncherError::InvalidTransition {
                from: self.current.name(),
                to: target.name(),
            });
        }

        let previous = self.current;
        tracing::info!("switching screen {} -> {}", previous, target);

        hooks.on_leave(previous);
        self.current = target;
        hooks.on_enter(target);
        Ok(())
    }

    /// Global back signal: go home, or ask to quit if already there
    pub fn handle_back(&mut self, hooks: &mut impl ScreenLifecycle) -> BackOutcome {
        if self.is_home() {
            return BackOutcome::ExitRequested;
        }
        // Home is registered by construction
        if let Err(e) = self.switch_to(Screen::Home, hooks) {
            tracing::error!("cannot return home: {}", e);
        }
        BackOutcome::Handled
    }
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self::new()
    }
}
