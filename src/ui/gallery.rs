use iced::widget::{container, image, scrollable, text};
use iced::{Color, Element, Length};
use iced_aw::Wrap;

use crate::Message;

/// Thumbnail height in the grid
const TILE_HEIGHT: f32 = 150.0;

/// Two thumbnails fit side by side in the portrait window
const TILE_WIDTH: f32 = 165.0;

/// One listed photo as the grid draws it
#[derive(Debug, Clone)]
pub struct Tile {
    pub name: String,
    /// `None` until decoded, and for files that do not decode
    pub image: Option<image::Handle>,
}

fn tile(tile: &Tile) -> Element<'static, Message> {
    match &tile.image {
        Some(handle) => image(handle.clone())
            .width(TILE_WIDTH)
            .height(TILE_HEIGHT)
            .into(),
        None => container(text(tile.name.clone()).size(12).color(Color::BLACK))
            .width(TILE_WIDTH)
            .height(TILE_HEIGHT)
            .center_x(TILE_WIDTH)
            .center_y(TILE_HEIGHT)
            .style(container::bordered_box)
            .into(),
    }
}

/// Scrollable two-column grid with one tile per listed photo
pub fn view(tiles: &[Tile]) -> Element<'static, Message> {
    if tiles.is_empty() {
        return container(text("No photos yet").color(Color::BLACK))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let grid = Wrap::with_elements(tiles.iter().map(tile).collect())
        .spacing(10.0)
        .line_spacing(10.0);

    scrollable(container(grid).width(Length::Fill).padding(10)).into()
}
