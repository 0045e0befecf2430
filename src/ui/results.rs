use iced::widget::{button, canvas, column, container, image, row, scrollable, stack, text};
use iced::{Background, Border, Color, ContentFit, Element, Length, Pixels};
use iced_aw::Wrap;
use tracing::debug;

use super::overlay::{self, MarkerLayer, Swatch};
use super::palette_bar::PaletteBar;
use crate::app::Message;
use crate::color::HexColor;
use crate::state::carrier::{Route, TransferPayload};
use crate::state::result::ExtractionResult;

const SWATCH_SIZE: f32 = 96.0;

/// The results view owns the transfer payload, and with it the preview,
/// for as long as it is shown
#[derive(Debug)]
pub struct ResultsView {
    payload: TransferPayload,
    selected: Option<usize>,
}

impl ResultsView {
    pub fn new(payload: TransferPayload) -> Self {
        Self {
            payload,
            selected: None,
        }
    }

    pub fn result(&self) -> &ExtractionResult {
        &self.payload.result
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Highlight a swatch and return its color for the clipboard
    pub fn select(&mut self, index: usize) -> Option<HexColor> {
        let color = self.result().colors().get(index).copied()?;
        debug!(index, color = %color, "Swatch selected");
        self.selected = Some(index);
        Some(color)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let result = &self.payload.result;
        let preview = &self.payload.preview;

        let swatches = overlay::swatches(result);

        let heading = match result {
            ExtractionResult::FlatPalette(colors) => format!("Palette · {} colors", colors.len()),
            ExtractionResult::ClusterSet(clusters) => {
                format!("Palette · {} clusters", clusters.len())
            }
        };

        let swatches = if swatches.is_empty() {
            Element::from(text("The service returned no colors").size(16))
        } else {
            Wrap::with_elements(
                swatches
                    .iter()
                    .map(|swatch| swatch_button(swatch, self.selected == Some(swatch.index)))
                    .collect(),
            )
            .spacing(Pixels(8.0))
            .line_spacing(Pixels(8.0))
            .into()
        };

        let palette = column![
            text(heading).size(28),
            text("Click a color to copy it").size(14),
            scrollable(swatches).height(Length::Fill),
        ]
        .push_maybe(match result {
            ExtractionResult::ClusterSet(clusters) if !clusters.is_empty() => Some(
                canvas(PaletteBar { clusters })
                    .width(Length::Fill)
                    .height(Length::Fixed(28.0)),
            ),
            _ => None,
        })
        .push(
            button("Back")
                .on_press(Message::Navigate(Route::Entry))
                .padding(10),
        )
        .spacing(16)
        .width(Length::Fixed(340.0));

        let picture = image(preview.image().clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill);

        let annotated: Element<'_, Message> = match result {
            ExtractionResult::ClusterSet(_) => stack![
                picture,
                canvas(MarkerLayer {
                    result,
                    natural_size: preview.natural_size(),
                    selected: self.selected,
                })
                .width(Length::Fill)
                .height(Length::Fill),
            ]
            .into(),
            ExtractionResult::FlatPalette(_) => picture.into(),
        };

        container(row![palette, annotated].spacing(30))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(30)
            .into()
    }
}

fn swatch_button(swatch: &Swatch, selected: bool) -> Element<'static, Message> {
    let fill = swatch.color.to_color();
    let label_color = swatch.color.label_color();

    let mut label = column![text(swatch.color.to_string()).size(14)];
    if let Some(percentage) = swatch.percentage {
        label = label.push(text(format!("{:.1}%", percentage)).size(12));
    }

    button(label)
        .width(Length::Fixed(SWATCH_SIZE))
        .height(Length::Fixed(SWATCH_SIZE))
        .padding(8)
        .on_press(Message::SwatchPressed(swatch.index))
        .style(move |_theme, _status| button::Style {
            background: Some(Background::Color(fill)),
            text_color: label_color,
            border: Border {
                color: if selected { Color::WHITE } else { Color::TRANSPARENT },
                width: 3.0,
                radius: 6.0.into(),
            },
            ..button::Style::default()
        })
        .into()
}
