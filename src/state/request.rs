use reqwest::multipart::{Form, Part};
use reqwest::Body;

use super::asset::{AssetFile, SelectedAsset};
use super::params::ExtractionParameters;
use crate::error::ExtractError;

/// Multipart field names expected by the extraction service
pub const IMAGE_FIELD: &str = "image";
pub const COLOR_COUNT_FIELD: &str = "n_colors";
pub const BRIGHTNESS_FIELD: &str = "brightness";
pub const CONTRAST_FIELD: &str = "contrast";
pub const GRAYSCALE_FIELD: &str = "grayscale";

/// Immutable snapshot of what gets uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub image: AssetFile,
    pub params: ExtractionParameters,
}

impl ExtractionRequest {
    /// Build a request from the current selection.
    ///
    /// Refuses when nothing is selected or fewer than one color is asked for.
    pub fn build(
        asset: Option<&SelectedAsset>,
        params: &ExtractionParameters,
    ) -> Result<ExtractionRequest, ExtractError> {
        let asset = asset.ok_or(ExtractError::NoAssetSelected)?;

        if params.color_count < 1 {
            return Err(ExtractError::InvalidColorCount(params.color_count));
        }

        Ok(ExtractionRequest {
            image: asset.file.clone(),
            params: *params,
        })
    }

    /// Textual form fields, in upload order
    pub fn text_fields(&self) -> [(&'static str, String); 4] {
        [
            (COLOR_COUNT_FIELD, self.params.color_count.to_string()),
            (BRIGHTNESS_FIELD, self.params.brightness.to_string()),
            (CONTRAST_FIELD, self.params.contrast.to_string()),
            (GRAYSCALE_FIELD, self.params.grayscale.to_string()),
        ]
    }

    /// Multipart body for the extraction endpoint.
    ///
    /// The image part streams the shared buffer, so no copy of the file is made.
    pub fn to_form(&self) -> Result<Form, ExtractError> {
        let length = self.image.bytes.len() as u64;
        let image = Part::stream_with_length(Body::from(self.image.bytes.clone()), length)
            .file_name(self.image.file_name.clone())
            .mime_str(self.image.mime_type())
            .map_err(|e| ExtractError::Transport(e.to_string()))?;

        let form = self
            .text_fields()
            .into_iter()
            .fold(Form::new().part(IMAGE_FIELD, image), |form, (name, value)| {
                form.text(name, value)
            });

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::asset::tests::sample_file;
    use crate::state::asset::AssetSelector;
    use crate::state::preview::PreviewRegistry;

    fn selector_with_asset() -> AssetSelector {
        let mut selector = AssetSelector::new(PreviewRegistry::new());
        selector.set_asset(sample_file("photo.png"));
        selector
    }

    fn field<'a>(fields: &'a [(&'static str, String); 4], name: &str) -> &'a str {
        fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_build_encodes_color_count_exactly() {
        let selector = selector_with_asset();
        for count in [1u32, 2, 5, 17, 256, u32::MAX] {
            let params = ExtractionParameters {
                color_count: count,
                ..Default::default()
            };
            let request = ExtractionRequest::build(selector.current(), &params).unwrap();
            assert_eq!(field(&request.text_fields(), "n_colors"), count.to_string());
        }
    }

    #[test]
    fn test_build_refuses_without_asset() {
        for params in [
            ExtractionParameters::default(),
            ExtractionParameters {
                color_count: 0,
                brightness: -100,
                contrast: 100,
                grayscale: true,
            },
        ] {
            assert_eq!(
                ExtractionRequest::build(None, &params),
                Err(ExtractError::NoAssetSelected)
            );
        }
    }

    #[test]
    fn test_build_refuses_zero_colors() {
        let selector = selector_with_asset();
        let params = ExtractionParameters {
            color_count: 0,
            ..Default::default()
        };
        assert_eq!(
            ExtractionRequest::build(selector.current(), &params),
            Err(ExtractError::InvalidColorCount(0))
        );
    }

    #[test]
    fn test_field_encoding() {
        let selector = selector_with_asset();
        let params = ExtractionParameters {
            color_count: 8,
            brightness: -20,
            contrast: 35,
            grayscale: true,
        };
        let request = ExtractionRequest::build(selector.current(), &params).unwrap();
        let fields = request.text_fields();

        assert_eq!(field(&fields, "brightness"), "-20");
        assert_eq!(field(&fields, "contrast"), "35");
        assert_eq!(field(&fields, "grayscale"), "true");

        let names: Vec<_> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["n_colors", "brightness", "contrast", "grayscale"]);
    }

    #[test]
    fn test_request_is_a_snapshot() {
        let mut selector = selector_with_asset();
        let mut params = ExtractionParameters::default();
        let first = ExtractionRequest::build(selector.current(), &params).unwrap();

        params.color_count = 9;
        selector.set_asset(sample_file("other.png"));
        let second = ExtractionRequest::build(selector.current(), &params).unwrap();

        assert_eq!(first.params.color_count, 5);
        assert_eq!(first.image.file_name, "photo.png");
        assert_eq!(second.params.color_count, 9);
        assert_eq!(second.image.file_name, "other.png");
        assert_eq!(
            first.image.bytes.as_ref(),
            crate::state::asset::tests::PNG_1X1
        );
    }
}
