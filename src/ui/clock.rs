use iced::widget::{column, container, text};
use iced::{Alignment, Color, Element, Length};

use crate::state::clock::ClockSample;
use crate::Message;

pub fn view(sample: &ClockSample) -> Element<'_, Message> {
    let content = column![
        text(&sample.date).size(36).color(Color::BLACK),
        text(&sample.time).size(48).color(Color::BLACK),
    ]
    .spacing(10)
    .padding(20)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
