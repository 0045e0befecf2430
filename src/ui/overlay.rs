use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::app::Message;
use crate::color::HexColor;
use crate::state::result::ExtractionResult;

/// Marker diameter in logical pixels
pub const MARKER_DIAMETER: f32 = 32.0;

/// Ring around each marker
const RING_WIDTH: f32 = 4.0;
const SELECTED_RING_WIDTH: f32 = 7.0;

/// Where the image is actually drawn inside its widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    pub origin: Point,
    pub size: Size,
}

impl ImageBox {
    /// A box at the widget origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            origin: Point::ORIGIN,
            size: Size::new(width, height),
        }
    }

    /// Box of an image of `natural` pixels fitted with `ContentFit::Contain`
    /// and centered inside `bounds`
    pub fn contain(bounds: Size, natural: Size<u32>) -> Self {
        if natural.width == 0 || natural.height == 0 {
            return Self::new(0.0, 0.0);
        }

        let natural = Size::new(natural.width as f32, natural.height as f32);
        let scale = (bounds.width / natural.width).min(bounds.height / natural.height);
        let size = Size::new(natural.width * scale, natural.height * scale);

        Self {
            origin: Point::new(
                (bounds.width - size.width) / 2.0,
                (bounds.height - size.height) / 2.0,
            ),
            size,
        }
    }

    /// Map a normalized coordinate onto the screen
    pub fn project(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.origin.x + x as f32 * self.size.width,
            self.origin.y + y as f32 * self.size.height,
        )
    }
}

/// A palette entry as listed next to the image
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub index: usize,
    pub color: HexColor,
    pub percentage: Option<f64>,
}

/// A marker drawn over the image where its color was sampled
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub index: usize,
    pub color: HexColor,
    pub center: Point,
    pub diameter: f32,
}

impl Marker {
    /// Top-left corner: markers are anchored at their own center
    pub fn top_left(&self) -> Point {
        self.center - Vector::new(self.diameter / 2.0, self.diameter / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.diameter / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub swatches: Vec<Swatch>,
    pub markers: Vec<Marker>,
}

impl Overlay {
    /// Topmost marker under a point (later markers are drawn on top)
    pub fn marker_at(&self, point: Point) -> Option<&Marker> {
        self.markers.iter().rev().find(|marker| marker.contains(point))
    }
}

/// Ordered swatches of a result. They carry no position.
pub fn swatches(result: &ExtractionResult) -> Vec<Swatch> {
    match result {
        ExtractionResult::FlatPalette(colors) => colors
            .iter()
            .enumerate()
            .map(|(index, &color)| Swatch {
                index,
                color,
                percentage: None,
            })
            .collect(),
        ExtractionResult::ClusterSet(clusters) => clusters
            .iter()
            .enumerate()
            .map(|(index, cluster)| Swatch {
                index,
                color: cluster.hex,
                percentage: Some(cluster.percentage),
            })
            .collect(),
    }
}

/// Lay out swatches and markers for a result shown in `image_box`.
///
/// Pure: the same inputs always give the same overlay. A flat palette has
/// no sample positions, so it yields swatches only.
pub fn render(result: &ExtractionResult, image_box: &ImageBox) -> Overlay {
    let markers = match result {
        ExtractionResult::FlatPalette(_) => Vec::new(),
        ExtractionResult::ClusterSet(clusters) => clusters
            .iter()
            .enumerate()
            .map(|(index, cluster)| Marker {
                index,
                color: cluster.hex,
                center: image_box.project(cluster.avg_x, cluster.avg_y),
                diameter: MARKER_DIAMETER,
            })
            .collect(),
    };

    Overlay {
        swatches: swatches(result),
        markers,
    }
}

/// Canvas layer stacked on top of the result image
pub struct MarkerLayer<'a> {
    pub result: &'a ExtractionResult,
    /// Pixel size of the image underneath
    pub natural_size: Size<u32>,
    pub selected: Option<usize>,
}

impl MarkerLayer<'_> {
    fn overlay(&self, bounds: Rectangle) -> Overlay {
        render(self.result, &ImageBox::contain(bounds.size(), self.natural_size))
    }
}

impl Program<Message> for MarkerLayer<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        for marker in &self.overlay(bounds).markers {
            let circle = Path::circle(marker.center, marker.diameter / 2.0);
            let ring = if self.selected == Some(marker.index) {
                SELECTED_RING_WIDTH
            } else {
                RING_WIDTH
            };

            frame.fill(&circle, marker.color.to_color());
            frame.stroke(
                &circle,
                Stroke::default().with_color(Color::WHITE).with_width(ring),
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if let canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if let Some(position) = cursor.position_in(bounds) {
                if let Some(marker) = self.overlay(bounds).marker_at(position) {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::SwatchPressed(marker.index)),
                    );
                }
            }
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        let hovering_marker = cursor
            .position_in(bounds)
            .map_or(false, |position| self.overlay(bounds).marker_at(position).is_some());

        if hovering_marker {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::result::ColorCluster;

    fn red_cluster() -> ExtractionResult {
        ExtractionResult::ClusterSet(vec![ColorCluster {
            hex: HexColor::new(255, 0, 0),
            percentage: 40.0,
            avg_x: 0.25,
            avg_y: 0.75,
        }])
    }

    #[test]
    fn test_cluster_marker_position() {
        let overlay = render(&red_cluster(), &ImageBox::new(200.0, 100.0));
        assert_eq!(overlay.markers.len(), 1);
        assert_eq!(overlay.markers[0].center, Point::new(50.0, 75.0));
        assert_eq!(overlay.swatches[0].percentage, Some(40.0));
    }

    #[test]
    fn test_marker_is_anchored_at_center() {
        let overlay = render(&red_cluster(), &ImageBox::new(200.0, 100.0));
        let marker = &overlay.markers[0];
        assert_eq!(
            marker.top_left(),
            Point::new(50.0 - MARKER_DIAMETER / 2.0, 75.0 - MARKER_DIAMETER / 2.0)
        );
    }

    #[test]
    fn test_flat_palette_has_no_markers() {
        let result = ExtractionResult::FlatPalette(vec![
            HexColor::new(0, 0, 0),
            HexColor::new(255, 255, 255),
        ]);
        let overlay = render(&result, &ImageBox::new(200.0, 100.0));
        assert_eq!(overlay.swatches.len(), 2);
        assert!(overlay.markers.is_empty());
        assert!(overlay.swatches.iter().all(|s| s.percentage.is_none()));
    }

    #[test]
    fn test_swatches_follow_result_order() {
        let swatches = swatches(&red_cluster());
        assert_eq!(
            swatches,
            vec![Swatch {
                index: 0,
                color: HexColor::new(255, 0, 0),
                percentage: Some(40.0),
            }]
        );
        assert_eq!(render(&red_cluster(), &ImageBox::new(10.0, 10.0)).swatches, swatches);
    }

    #[test]
    fn test_render_is_idempotent() {
        let result = ExtractionResult::ClusterSet(vec![
            ColorCluster {
                hex: HexColor::new(10, 20, 30),
                percentage: 70.0,
                avg_x: 0.1,
                avg_y: 0.9,
            },
            ColorCluster {
                hex: HexColor::new(200, 100, 0),
                percentage: 30.0,
                avg_x: 0.6,
                avg_y: 0.2,
            },
        ]);
        let image_box = ImageBox::contain(Size::new(800.0, 600.0), Size::new(1920, 1080));

        let first = render(&result, &image_box);
        let second = render(&result, &image_box);
        assert_eq!(first, second);
        assert_eq!(first.markers.len(), 2);
    }

    #[test]
    fn test_contain_letterboxes_wide_image() {
        // 2:1 image in a square widget: full width, centered vertically
        let image_box = ImageBox::contain(Size::new(400.0, 400.0), Size::new(1000, 500));
        assert_eq!(image_box.size, Size::new(400.0, 200.0));
        assert_eq!(image_box.origin, Point::new(0.0, 100.0));

        assert_eq!(image_box.project(0.5, 0.5), Point::new(200.0, 200.0));
        assert_eq!(image_box.project(0.0, 0.0), Point::new(0.0, 100.0));
    }

    #[test]
    fn test_contain_pillarboxes_tall_image() {
        let image_box = ImageBox::contain(Size::new(400.0, 200.0), Size::new(100, 200));
        assert_eq!(image_box.size, Size::new(100.0, 200.0));
        assert_eq!(image_box.origin, Point::new(150.0, 0.0));
    }

    #[test]
    fn test_contain_degenerate_image() {
        let image_box = ImageBox::contain(Size::new(400.0, 200.0), Size::new(0, 200));
        assert_eq!(image_box.size, Size::new(0.0, 0.0));
    }

    #[test]
    fn test_marker_hit_testing_prefers_topmost() {
        let overlay = Overlay {
            swatches: Vec::new(),
            markers: vec![
                Marker {
                    index: 0,
                    color: HexColor::new(0, 0, 0),
                    center: Point::new(10.0, 10.0),
                    diameter: MARKER_DIAMETER,
                },
                Marker {
                    index: 1,
                    color: HexColor::new(255, 255, 255),
                    center: Point::new(20.0, 10.0),
                    diameter: MARKER_DIAMETER,
                },
            ],
        };

        assert_eq!(overlay.marker_at(Point::new(15.0, 10.0)).map(|m| m.index), Some(1));
        assert_eq!(overlay.marker_at(Point::new(-4.0, 10.0)).map(|m| m.index), Some(0));
        assert!(overlay.marker_at(Point::new(200.0, 200.0)).is_none());
    }
}
