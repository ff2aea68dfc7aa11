use iced::widget::{button, column, container, image, text};
use iced::{Color, Element, Length};

use crate::Message;

/// Live preview filling the screen above the capture button
pub fn view<'a>(preview: Option<&image::Handle>, status: Option<&str>) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match preview {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => container(text("No camera frame").color(Color::BLACK))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    let mut content = column![container(preview).height(Length::FillPortion(4))];
    if let Some(status) = status {
        content = content.push(text(status.to_string()).size(14).color(Color::BLACK));
    }
    content
        .push(
            button(container(text("📸 Capture Photo")).center_x(Length::Fill))
                .on_press(Message::CapturePhoto)
                .width(Length::Fill)
                .height(Length::FillPortion(1)),
        )
        .into()
}
