use iced::widget::{button, column, container, opaque, text};
use iced::{Alignment, Background, Color, Element, Length};

use crate::app::Message;

/// Full-window overlay shown while an extraction is in flight.
///
/// Wrapped in `opaque` so clicks never reach the widgets underneath; the only
/// live control is Cancel.
pub fn overlay<'a>(status: &'a str) -> Element<'a, Message> {
    let content = column![
        text("Extracting palette…").size(28),
        text(status).size(14),
        button("Cancel")
            .on_press(Message::CancelSubmission)
            .padding(10),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    opaque(
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.7))),
                text_color: Some(Color::WHITE),
                ..container::Style::default()
            }),
    )
}
