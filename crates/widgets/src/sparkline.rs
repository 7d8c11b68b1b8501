use fan_renderer::{SparklineDims, SparklinePath};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Element, Length, Point, Rectangle, Renderer,
};

/// Stroke width of the sparkline, in logical pixels.
const LINE_WIDTH: f32 = 2.0;

/// Canvas program drawing a precomputed [`SparklinePath`].
///
/// A one-sample history has no segment to stroke, so it is drawn as a dot.
#[derive(Debug, Clone)]
pub struct SparklineChart {
    path:  SparklinePath,
    color: iced::Color,
    dims:  SparklineDims,
}

impl SparklineChart {
    pub fn new(path: SparklinePath, color: iced::Color, dims: SparklineDims) -> Self {
        Self { path, color, dims }
    }

    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        let (width, height) = (self.dims.width, self.dims.height);
        canvas::Canvas::new(self)
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .into()
    }
}

impl<Message> canvas::Program<Message> for SparklineChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        match self.path.points() {
            [] => {}
            [only] => {
                let dot = Path::circle(Point::new(only.x, only.y), LINE_WIDTH);
                frame.fill(&dot, self.color);
            }
            [first, rest @ ..] => {
                let line = Path::new(|b| {
                    b.move_to(Point::new(first.x, first.y));
                    for p in rest {
                        b.line_to(Point::new(p.x, p.y));
                    }
                });
                frame.stroke(
                    &line,
                    Stroke::default().with_width(LINE_WIDTH).with_color(self.color),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
