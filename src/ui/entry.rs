use iced::widget::{button, checkbox, column, container, image, row, slider, text, text_input};
use iced::{Alignment, Background, Border, Color, ContentFit, Element, Length};

use crate::app::Message;
use crate::state::asset::SelectedAsset;
use crate::state::params::{ExtractionParameters, ADJUSTMENT_RANGE};
use crate::state::submission::SubmissionState;

const ERROR_COLOR: Color = Color::from_rgb(0.95, 0.35, 0.35);
const DROP_HIGHLIGHT: Color = Color::from_rgb(0.35, 0.6, 1.0);

/// Everything the entry view reads
pub struct EntryProps<'a> {
    pub asset: Option<&'a SelectedAsset>,
    pub params: &'a ExtractionParameters,
    /// What Reset restores
    pub defaults: &'a ExtractionParameters,
    pub color_count_input: &'a str,
    pub submission: &'a SubmissionState,
    pub status: &'a str,
    pub drop_hovering: bool,
}

impl EntryProps<'_> {
    /// Submit is offered only when a request could actually be built and
    /// nothing is in flight
    pub fn can_submit(&self) -> bool {
        self.asset.is_some()
            && self.params.color_count >= 1
            && !matches!(self.submission, SubmissionState::InFlight)
    }
}

pub fn view<'a>(props: EntryProps<'a>) -> Element<'a, Message> {
    let can_submit = props.can_submit();

    let drop_zone = drop_zone(props.asset, props.drop_hovering);

    let file_controls = row![
        button("Choose Image…").on_press(Message::PickFile).padding(10),
        button("Remove")
            .on_press_maybe(props.asset.map(|_| Message::ClearAsset))
            .padding(10),
    ]
    .spacing(10);

    let color_count_valid = props.params.color_count >= 1;
    let color_count = column![
        text("Number of colors to extract").size(16),
        text_input("5", props.color_count_input)
            .on_input(Message::ColorCountChanged)
            .width(Length::Fixed(120.0)),
    ]
    .push_maybe((!color_count_valid).then(|| {
        text("Enter a whole number of at least 1")
            .size(12)
            .color(ERROR_COLOR)
    }))
    .spacing(6);

    let brightness = adjustment(
        "Brightness",
        props.params.brightness,
        Message::BrightnessChanged,
    );
    let contrast = adjustment("Contrast", props.params.contrast, Message::ContrastChanged);

    let grayscale = checkbox("Grayscale", props.params.grayscale)
        .on_toggle(Message::GrayscaleToggled);

    let actions = row![
        button("Extract Palette")
            .on_press_maybe(can_submit.then_some(Message::Submit))
            .padding(10),
        button("Reset")
            .on_press_maybe((props.params != props.defaults).then_some(Message::ResetParameters))
            .padding(10),
    ]
    .spacing(10);

    let status = match props.submission {
        SubmissionState::Failed(_) => text(props.status).size(14).color(ERROR_COLOR),
        _ => text(props.status).size(14),
    };

    let controls = column![
        color_count,
        brightness,
        contrast,
        grayscale,
        actions,
        status,
    ]
    .spacing(18)
    .width(Length::Fixed(320.0));

    let content = column![
        text("Color Palette Extractor").size(36),
        row![
            column![drop_zone, file_controls].spacing(10).width(Length::Fill),
            controls,
        ]
        .spacing(30)
        .height(Length::Fill),
    ]
    .spacing(20)
    .padding(30);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Labeled slider for a value in [-100, 100]
fn adjustment<'a>(
    label: &'a str,
    value: i32,
    on_change: fn(i32) -> Message,
) -> Element<'a, Message> {
    column![
        row![text(label).size(16), text(value.to_string()).size(16)]
            .spacing(10)
            .align_y(Alignment::Center),
        slider(ADJUSTMENT_RANGE, value, on_change),
    ]
    .spacing(6)
    .into()
}

/// Preview of the selected image, or a prompt to drop one
fn drop_zone<'a>(asset: Option<&'a SelectedAsset>, hovering: bool) -> Element<'a, Message> {
    let inner: Element<'a, Message> = match asset {
        Some(asset) => column![
            image(asset.preview.image().clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill),
            text(format!(
                "{} · {}×{}",
                asset.file.file_name, asset.file.dimensions.width, asset.file.dimensions.height
            ))
            .size(14),
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .into(),
        None => text("Drop an image here or choose a file").size(18).into(),
    };

    let border_color = if hovering {
        DROP_HIGHLIGHT
    } else {
        Color::from_rgb(0.4, 0.4, 0.4)
    };

    container(inner)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(12)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(Color::from_rgb(0.12, 0.12, 0.12))),
            border: Border {
                color: border_color,
                width: if hovering { 3.0 } else { 1.0 },
                radius: 8.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::asset::tests::sample_file;
    use crate::state::asset::AssetSelector;
    use crate::state::preview::PreviewRegistry;

    fn props<'a>(
        asset: Option<&'a SelectedAsset>,
        params: &'a ExtractionParameters,
        submission: &'a SubmissionState,
    ) -> EntryProps<'a> {
        EntryProps {
            asset,
            params,
            defaults: params,
            color_count_input: "",
            submission,
            status: "",
            drop_hovering: false,
        }
    }

    #[test]
    fn test_submit_requires_asset() {
        let params = ExtractionParameters::default();
        assert!(!props(None, &params, &SubmissionState::Idle).can_submit());
    }

    #[test]
    fn test_submit_locked_while_in_flight() {
        let mut selector = AssetSelector::new(PreviewRegistry::new());
        selector.set_asset(sample_file("photo.png"));
        let params = ExtractionParameters::default();

        assert!(props(selector.current(), &params, &SubmissionState::Idle).can_submit());
        assert!(!props(selector.current(), &params, &SubmissionState::InFlight).can_submit());

        let zero = ExtractionParameters {
            color_count: 0,
            ..Default::default()
        };
        assert!(!props(selector.current(), &zero, &SubmissionState::Idle).can_submit());
    }
}
