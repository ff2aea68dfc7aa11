use iced::alignment::Horizontal;
use iced::widget::{button, column, container, text, Column, Row};
use iced::{Element, Length};

use crate::state::calculator::{Calculator, KEYPAD};
use crate::Message;

fn key(label: &'static str, message: Message) -> Element<'static, Message> {
    button(
        container(text(label).size(24))
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    )
    .on_press(message)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// Display above a 4x4 keypad and a wide `=` key
pub fn view(calculator: &Calculator) -> Element<'_, Message> {
    let display = container(text(calculator.display()).size(32))
        .width(Length::Fill)
        .padding(10)
        .align_x(Horizontal::Right)
        .style(container::bordered_box);

    let keypad = KEYPAD.iter().fold(Column::new().spacing(10), |grid, keys| {
        let row = keys.iter().fold(Row::new().spacing(10), |row, label| {
            row.push(key(*label, Message::CalculatorKey(*label)))
        });
        grid.push(row.height(Length::Fill))
    });

    column![
        display,
        container(keypad).height(Length::FillPortion(3)),
        container(key("=", Message::CalculatorEquals)).height(Length::FillPortion(1)),
    ]
    .spacing(10)
    .padding(10)
    .into()
}
