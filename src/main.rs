use iced::keyboard::{self, key::Named, Key};
use iced::widget::{container, image};
use iced::{time, Element, Length, Subscription, Task, Theme};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod context;
mod error;
mod media;
mod state;
mod ui;

use config::LauncherConfig;
use context::AppContext;
use media::audio::native::CpalBackend;
use media::camera::native::NokhwaBackend;
use state::gallery::{load_thumbnails, GalleryTile};
use state::menu::HomeMenu;
use state::registry::{BackOutcome, Screen, ScreenRegistry};

/// Main application state
struct Launcher {
    /// Which screen is showing
    registry: ScreenRegistry,
    /// State of every mini-app
    ctx: AppContext,
    menu: HomeMenu,
    /// Latest camera frame, ready to draw
    preview: Option<image::Handle>,
    /// Gallery tiles for the current visit
    tiles: Vec<ui::gallery::Tile>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Home menu icon pressed
    OpenScreen(Screen),
    /// Platform back key
    Back,
    CalculatorKey(&'static str),
    CalculatorEquals,
    ClockTick,
    MicStart,
    /// Background audio worker finished opening the devices
    MicStarted(Result<(), String>),
    MicStop,
    CameraTick,
    CapturePhoto,
    /// Thumbnails decoded for the gallery visit with this id
    ThumbnailsLoaded(u64, Vec<GalleryTile>),
}

impl Launcher {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = LauncherConfig::new();
        // Without a photo folder the camera and gallery cannot work
        config
            .ensure_photo_dir()
            .expect("Failed to create photo folder. Check permissions and disk space.");
        tracing::info!("📁 Photos are stored in {}", config.photo_dir.display());

        // A bad screen table is a build defect, not a runtime condition
        let registry =
            ScreenRegistry::with_all_screens().expect("Screen table must have unique names");
        let menu = HomeMenu;
        menu.validate(&registry)
            .expect("Every home icon must open a registered screen");

        let ctx = AppContext::new(config, Arc::new(CpalBackend), Box::new(NokhwaBackend));

        (
            Launcher {
                registry,
                ctx,
                menu,
                preview: None,
                tiles: Vec::new(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenScreen(screen) => {
                if let Err(e) = self.registry.switch_to(screen, &mut self.ctx) {
                    tracing::error!("{}", e);
                    return Task::none();
                }
                self.after_switch()
            }
            Message::Back => match self.registry.handle_back(&mut self.ctx) {
                BackOutcome::Handled => self.after_switch(),
                BackOutcome::ExitRequested => {
                    tracing::info!("👋 back pressed on home, exiting");
                    self.ctx.shutdown();
                    iced::exit()
                }
            },
            Message::CalculatorKey(key) => {
                self.ctx.calculator.press(key);
                Task::none()
            }
            Message::CalculatorEquals => {
                self.ctx.calculator.evaluate();
                Task::none()
            }
            Message::ClockTick => {
                self.ctx.clock.tick();
                Task::none()
            }
            Message::MicStart => {
                self.ctx.mic_status = None;
                let pending = self.ctx.mic.start();
                Task::perform(pending.wait(), |result| {
                    Message::MicStarted(result.map_err(|e| e.to_string()))
                })
            }
            Message::MicStarted(result) => {
                self.ctx.mic_status = result.err();
                Task::none()
            }
            Message::MicStop => {
                self.ctx.mic.stop();
                Task::none()
            }
            Message::CameraTick => {
                if self.ctx.poll_camera() {
                    self.preview = self.ctx.preview.as_ref().map(|frame| {
                        image::Handle::from_rgba(frame.width, frame.height, frame.pixels.clone())
                    });
                }
                Task::none()
            }
            Message::CapturePhoto => {
                self.ctx.capture_photo();
                Task::none()
            }
            Message::ThumbnailsLoaded(visit, loaded) => {
                // Drop loads that finish after their visit ended
                if !self.ctx.gallery_visit.is_current(visit) {
                    tracing::debug!("discarding thumbnails of gallery visit {}", visit);
                    return Task::none();
                }
                self.tiles = loaded
                    .into_iter()
                    .map(|tile| ui::gallery::Tile {
                        name: tile.entry.file_name(),
                        image: tile
                            .thumbnail
                            .map(|t| image::Handle::from_rgba(t.width, t.height, t.pixels)),
                    })
                    .collect();
                Task::none()
            }
        }
    }

    /// Reset per-visit view state and kick off the gallery thumbnail load
    fn after_switch(&mut self) -> Task<Message> {
        self.preview = None;
        self.tiles.clear();

        let Some(visit) = self.ctx.gallery_visit.current() else {
            return Task::none();
        };
        // Name tiles show right away; thumbnails replace them once decoded
        let entries = self.ctx.gallery_entries.clone();
        self.tiles = entries
            .iter()
            .map(|entry| ui::gallery::Tile {
                name: entry.file_name(),
                image: None,
            })
            .collect();
        Task::perform(load_thumbnails(entries), move |loaded| {
            Message::ThumbnailsLoaded(visit, loaded)
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let screen = match self.registry.current() {
            Screen::Home => ui::home::view(&self.menu),
            Screen::Calculator => ui::calculator::view(&self.ctx.calculator),
            Screen::Clock => ui::clock::view(self.ctx.clock.latest()),
            Screen::Mic => {
                ui::mic::view(self.ctx.mic.is_running(), self.ctx.mic_status.as_deref())
            }
            Screen::Camera => {
                ui::camera::view(self.preview.as_ref(), self.ctx.camera_status.as_deref())
            }
            Screen::Gallery => ui::gallery::view(&self.tiles),
        };

        container(screen)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Back key everywhere; clock and camera ticks only while their screen shows
    fn subscription(&self) -> Subscription<Message> {
        let back = keyboard::on_key_press(|key, _modifiers| match key {
            Key::Named(Named::Escape) => Some(Message::Back),
            _ => None,
        });

        let ticks = match self.registry.current() {
            Screen::Clock => time::every(self.ctx.config.clock_interval).map(|_| Message::ClockTick),
            Screen::Camera => {
                time::every(self.ctx.config.preview_interval).map(|_| Message::CameraTick)
            }
            _ => Subscription::none(),
        };

        Subscription::batch([back, ticks])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "launcher=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Launcher v{} starting", env!("CARGO_PKG_VERSION"));

    iced::application("Launcher", Launcher::update, Launcher::view)
        .subscription(Launcher::subscription)
        .theme(Launcher::theme)
        .window_size((360.0, 640.0))
        .centered()
        .run_with(Launcher::new)
}
