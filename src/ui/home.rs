use iced::widget::{button, column, container, image, stack, text, Column};
use iced::{Alignment, Color, Element, Length};

use super::asset;
use crate::state::menu::{HomeMenu, MenuEntry};
use crate::Message;

/// Size of a home screen icon
const ICON_SIZE: f32 = 60.0;

fn icon_button(entry: &'static MenuEntry) -> Element<'static, Message> {
    let content = column![
        image(asset(entry.icon))
            .width(ICON_SIZE)
            .height(ICON_SIZE),
        text(entry.label).size(14).color(Color::BLACK),
    ]
    .spacing(5)
    .align_x(Alignment::Center);

    button(content)
        .on_press(Message::OpenScreen(entry.target))
        .style(button::text)
        .padding(10)
        .into()
}

/// Background picture with a column of app icons along the left edge
pub fn view(menu: &HomeMenu) -> Element<'static, Message> {
    let icons: Column<Message> = menu
        .entries()
        .iter()
        .fold(Column::new(), |col, entry| col.push(icon_button(entry)))
        .spacing(15)
        .padding(10)
        .width(100);

    let background = image(asset("background.png"))
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(iced::ContentFit::Fill);

    stack![background, container(icons).height(Length::Fill)].into()
}
