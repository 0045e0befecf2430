/// Proportional palette bar
/// Splits a horizontal bar by each cluster's share of the image
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Point, Rectangle, Size};

use crate::app::Message;
use crate::state::result::ColorCluster;

/// Horizontal extent of one cluster's segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub x: f32,
    pub width: f32,
}

/// Segments for a bar `width` wide.
///
/// Shares are normalized by their sum since service percentages are rounded
/// and need not add up to exactly 100.
pub fn segments(clusters: &[ColorCluster], width: f32) -> Vec<Segment> {
    let total: f64 = clusters.iter().map(|c| c.percentage).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut x = 0.0;
    clusters
        .iter()
        .enumerate()
        .map(|(index, cluster)| {
            let segment_width = (cluster.percentage / total) as f32 * width;
            let segment = Segment {
                index,
                x,
                width: segment_width,
            };
            x += segment_width;
            segment
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PaletteBar<'a> {
    pub clusters: &'a [ColorCluster],
}

impl canvas::Program<Message> for PaletteBar<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        for segment in segments(self.clusters, bounds.width) {
            let color = self.clusters[segment.index].hex.to_color();
            frame.fill_rectangle(
                Point::new(segment.x, 0.0),
                Size::new(segment.width, bounds.height),
                color,
            );
        }

        let outline = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.stroke(
            &outline,
            Stroke::default()
                .with_color(Color::from_rgba(1.0, 1.0, 1.0, 0.4))
                .with_width(1.0),
        );

        vec![frame.into_geometry()]
    }
}
