use crate::Message;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Size, Theme,
};
use netvisorcore::charts::{ChartView, LineSeries};

const PALETTE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

const MARGIN: f32 = 36.0;

pub fn series_color(index: usize) -> Color {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    Color::from_rgb8(r, g, b)
}

/// Value extent of every point in `series`; flat ranges are widened by one.
pub fn extent(series: &[LineSeries]) -> Option<((f64, f64), (f64, f64))> {
    let mut points = series.iter().flat_map(|line| line.points.iter());
    let &(x0, y0) = points.next()?;
    let ((mut x_lo, mut x_hi), (mut y_lo, mut y_hi)) = ((x0, x0), (y0, y0));
    for &(x, y) in points {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    if x_hi - x_lo < f64::EPSILON {
        x_hi = x_lo + 1.0;
    }
    if y_hi - y_lo < f64::EPSILON {
        y_lo -= 0.5;
        y_hi += 0.5;
    }
    Some(((x_lo, x_hi), (y_lo, y_hi)))
}

/// Maps a data point into a plot area of `size` inset by the margin.
pub fn project(point: (f64, f64), x: (f64, f64), y: (f64, f64), size: Size) -> Point {
    let width = (size.width - 2.0 * MARGIN).max(1.0);
    let height = (size.height - 2.0 * MARGIN).max(1.0);
    let nx = ((point.0 - x.0) / (x.1 - x.0)) as f32;
    let ny = ((point.1 - y.0) / (y.1 - y.0)) as f32;
    Point::new(MARGIN + nx * width, MARGIN + height - ny * height)
}

/// Multi-series time plot with an optional secondary axis.
#[derive(Clone)]
pub struct LineChart {
    view: ChartView,
}

impl LineChart {
    pub fn new(view: &ChartView) -> Self {
        Self { view: view.clone() }
    }

    fn label(frame: &mut Frame, content: String, position: Point, color: Color) {
        frame.fill_text(canvas::Text {
            content,
            position,
            color,
            size: 11.0.into(),
            ..canvas::Text::default()
        });
    }

    fn stroke_series(
        frame: &mut Frame,
        line: &LineSeries,
        x: (f64, f64),
        y: (f64, f64),
        size: Size,
        stroke: Stroke<'_>,
    ) {
        if line.points.len() < 2 {
            return;
        }
        let path = Path::new(|builder| {
            for (i, point) in line.points.iter().enumerate() {
                let p = project(*point, x, y, size);
                if i == 0 {
                    builder.move_to(p);
                } else {
                    builder.line_to(p);
                }
            }
        });
        frame.stroke(&path, stroke);
    }
}

impl canvas::Program<Message> for LineChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let size = bounds.size();
        let mut frame = Frame::new(renderer, size);
        frame.fill_rectangle(Point::ORIGIN, size, Color::from_rgb(0.05, 0.05, 0.07));

        let axis_color = Color::from_rgb(0.35, 0.35, 0.45);
        let axes = Path::new(|builder| {
            builder.move_to(Point::new(MARGIN, MARGIN));
            builder.line_to(Point::new(MARGIN, size.height - MARGIN));
            builder.line_to(Point::new(size.width - MARGIN, size.height - MARGIN));
            builder.line_to(Point::new(size.width - MARGIN, MARGIN));
        });
        frame.stroke(&axes, Stroke::default().with_color(axis_color).with_width(1.0));

        let Some(((x_lo, x_hi), primary_y)) = extent(&self.view.series) else {
            Self::label(
                &mut frame,
                "No series selected".into(),
                Point::new(MARGIN + 8.0, MARGIN + 8.0),
                axis_color,
            );
            return vec![frame.into_geometry()];
        };
        let primary_y = self.view.y_range.unwrap_or(primary_y);
        let x = (x_lo, x_hi);

        for (i, line) in self.view.series.iter().enumerate() {
            Self::stroke_series(
                &mut frame,
                line,
                x,
                primary_y,
                size,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(series_color(i)),
            );
        }

        if let Some((_, secondary_y)) = extent(&self.view.secondary) {
            for (i, line) in self.view.secondary.iter().enumerate() {
                let mut color = series_color(i);
                color.a = 0.55;
                Self::stroke_series(
                    &mut frame,
                    line,
                    x,
                    secondary_y,
                    size,
                    Stroke::default().with_width(1.0).with_color(color),
                );
            }
            if let Some(label) = self.view.secondary_label {
                Self::label(
                    &mut frame,
                    format!("{} {:.1}..{:.1}", label, secondary_y.0, secondary_y.1),
                    Point::new(size.width - MARGIN - 150.0, 6.0),
                    axis_color,
                );
            }
        }

        Self::label(
            &mut frame,
            format!("{} {:.2}..{:.2}", self.view.y_label, primary_y.0, primary_y.1),
            Point::new(MARGIN, 6.0),
            axis_color,
        );
        Self::label(
            &mut frame,
            format!("t {:.1}s..{:.1}s", x_lo, x_hi),
            Point::new(MARGIN, size.height - MARGIN + 8.0),
            axis_color,
        );

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> LineSeries {
        LineSeries {
            label: "User 1".into(),
            points: points.to_vec(),
        }
    }

    #[test]
    fn extent_covers_all_series_and_widens_flat_lines() {
        let series = [line(&[(0.0, 2.0), (1.0, 2.0)]), line(&[(3.0, 2.0)])];
        assert_eq!(extent(&series), Some(((0.0, 3.0), (1.5, 2.5))));
        assert_eq!(extent(&[line(&[])]), None);
    }

    #[test]
    fn projection_puts_origin_bottom_left() {
        let size = Size::new(200.0, 100.0);
        let p = project((0.0, 0.0), (0.0, 10.0), (0.0, 1.0), size);
        assert_eq!(p, Point::new(MARGIN, 100.0 - MARGIN));
        let q = project((10.0, 1.0), (0.0, 10.0), (0.0, 1.0), size);
        assert_eq!(q, Point::new(200.0 - MARGIN, MARGIN));
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(series_color(0), series_color(PALETTE.len()));
    }
}
