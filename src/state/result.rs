/// Extraction results as returned by the palette service
///
/// The service has answered in two shapes over time:
/// - `{ "palette": ["#rrggbb", ...] }` - colors only
/// - `{ "clusters": [{ "hex", "percentage", "avg_x", "avg_y" }, ...] }` -
///   colors with their share of the image and sample centroid
///
/// `decode` branches on which key is present and never assumes one shape.

use serde::Deserialize;
use tracing::debug;

use crate::color::HexColor;
use crate::error::ExtractError;

/// One dominant color with where it was sampled
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorCluster {
    pub hex: HexColor,
    /// Share of the image in [0, 100]
    pub percentage: f64,
    /// Sample centroid normalized to image width, in [0, 1]
    pub avg_x: f64,
    /// Sample centroid normalized to image height, in [0, 1]
    pub avg_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    /// Ordered colors, no spatial information
    FlatPalette(Vec<HexColor>),
    /// Ordered colors with share and sample centroid
    ClusterSet(Vec<ColorCluster>),
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        match self {
            ExtractionResult::FlatPalette(colors) => colors.len(),
            ExtractionResult::ClusterSet(clusters) => clusters.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Colors in service order, whatever the shape
    pub fn colors(&self) -> Vec<HexColor> {
        match self {
            ExtractionResult::FlatPalette(colors) => colors.clone(),
            ExtractionResult::ClusterSet(clusters) => clusters.iter().map(|c| c.hex).collect(),
        }
    }

    pub fn clusters(&self) -> Option<&[ColorCluster]> {
        match self {
            ExtractionResult::ClusterSet(clusters) => Some(clusters),
            ExtractionResult::FlatPalette(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    palette: Option<Vec<HexColor>>,
    #[serde(default)]
    clusters: Option<Vec<ColorCluster>>,
}

/// Decode a JSON response body
pub fn decode(body: &[u8]) -> Result<ExtractionResult, ExtractError> {
    let wire: WireResponse =
        serde_json::from_slice(body).map_err(|e| ExtractError::Decode(e.to_string()))?;

    match (wire.clusters, wire.palette) {
        (Some(clusters), palette) => {
            if palette.is_some() {
                debug!("Response carries both palette and clusters, using clusters");
            }
            for (index, cluster) in clusters.iter().enumerate() {
                validate_cluster(index, cluster)?;
            }
            Ok(ExtractionResult::ClusterSet(clusters))
        }
        (None, Some(palette)) => Ok(ExtractionResult::FlatPalette(palette)),
        (None, None) => Err(ExtractError::Decode(
            "response has neither \"palette\" nor \"clusters\"".to_string(),
        )),
    }
}

fn validate_cluster(index: usize, cluster: &ColorCluster) -> Result<(), ExtractError> {
    let in_range = |value: f64, max: f64| value.is_finite() && (0.0..=max).contains(&value);

    if !in_range(cluster.percentage, 100.0) {
        return Err(ExtractError::Decode(format!(
            "cluster {} percentage {} outside [0, 100]",
            index, cluster.percentage
        )));
    }

    if !in_range(cluster.avg_x, 1.0) || !in_range(cluster.avg_y, 1.0) {
        return Err(ExtractError::Decode(format!(
            "cluster {} position ({}, {}) outside [0, 1]",
            index, cluster.avg_x, cluster.avg_y
        )));
    }

    Ok(())
}
