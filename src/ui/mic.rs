use iced::widget::{button, column, container, image, row, stack, text};
use iced::{Color, Element, Length};

use super::asset;
use crate::Message;

/// Start/stop buttons over the mic background. Only the button that makes
/// sense in the current state is enabled.
pub fn view(running: bool, status: Option<&str>) -> Element<'static, Message> {
    let controls = row![
        button(text("🎤 Start Mic").size(20))
            .on_press_maybe((!running).then_some(Message::MicStart))
            .width(Length::Fill),
        button(text("🛑 Stop Mic").size(20))
            .on_press_maybe(running.then_some(Message::MicStop))
            .width(Length::Fill),
    ]
    .spacing(10)
    .padding(10);

    let mut content = column![controls];
    if let Some(status) = status {
        content = content.push(text(status.to_string()).size(14).color(Color::BLACK));
    }

    let background = image(asset("mic.png"))
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(iced::ContentFit::Fill);

    stack![background, container(content).width(Length::Fill)].into()
}
