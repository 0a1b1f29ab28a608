//! Plotters-powered daily trend chart widget for Ratatui.
//!
//! Ratatui's own `BarChart` covers the two categorical panels; the trend is a
//! line over time, where Plotters gives nicer axes and tick labels.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description. Series and bounds are computed by the
/// caller so `render()` only draws.
pub struct TrendChart<'a> {
    /// `(day number, rentals)` points, ascending by day.
    pub series: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Date labels are wide; the count axis is not.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0x66, 0xb3, 0xff);
            chart.draw_series(LineSeries::new(self.series.iter().copied(), &line_color))?;

            // Circle markers render oversized through the ratatui backend;
            // a pixel per day reads as a dot.
            chart.draw_series(self.series.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
