//! Plotters-powered cash flow chart widget for Ratatui.
//!
//! Shows projected FCF against its present value per forecast year, which makes
//! the effect of the discount rate visible while editing.
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

/// A render-only chart description. Series and bounds are computed by the caller.
pub struct FcfPlottersChart<'a> {
    /// `(year, projected FCF)`.
    pub projected: &'a [(f64, f64)],
    /// `(year, FCF discounted to today)`.
    pub discounted: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for FcfPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
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
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(self.projected.len().clamp(2, 10))
                .y_labels(5)
                .x_label_formatter(&|v| format!("Y{v:.0}"))
                .y_label_formatter(&|v| compact_amount(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            let projected_color = RGBColor(0, 255, 255); // cyan
            let discounted_color = RGBColor(0, 255, 0); // green

            chart.draw_series(LineSeries::new(self.projected.iter().copied(), &projected_color))?;
            chart.draw_series(LineSeries::new(self.discounted.iter().copied(), &discounted_color))?;

            // `Circle` radii are mis-scaled by the backend; a colored pixel marks each year.
            chart.draw_series(self.projected.iter().map(|&p| Pixel::new(p, WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// `450M`, `127.6B`, `2.2T` style axis labels for amounts in $M.
pub fn compact_amount(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{:.1}T", v / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{:.1}B", v / 1_000.0)
    } else {
        format!("{v:.0}M")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_amount_scales_millions() {
        assert_eq!(compact_amount(127_628.0), "127.6B");
        assert_eq!(compact_amount(2_180_314.0), "2.2T");
        assert_eq!(compact_amount(-450.0), "-450M");
    }
}
