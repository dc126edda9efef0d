//! Plotters-powered forecast chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: series, labels, and bounds are
/// computed outside the render call. This keeps `render()` focused on drawing
/// and makes it easy to test/benchmark the data prep separately.
pub struct ForecastChart<'a> {
    /// One point per month, x = month index in the series.
    pub points: &'a [(f64, f64)],
    /// The peak month, highlighted on top of the line.
    pub peak: Option<(f64, f64)>,
    /// `"YYYY-MM"` labels, indexed by month position (drives the x ticks).
    pub labels: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for ForecastChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let x_tick_count = self.labels.len().clamp(2, 6);

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering; the axes + labels are usually
            // enough for a monthly series.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(x_tick_count)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_month_tick(self.labels, *v))
                .y_label_formatter(&|v| fmt_arrivals_tick(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Series styling: keep the palette high-contrast for terminal
            // readability.
            let line_color = RGBColor(0, 255, 255); // cyan
            let point_color = WHITE;
            let peak_color = RGBColor(0, 255, 0); // green

            // 1) Forecast line.
            chart.draw_series(LineSeries::new(self.points.iter().copied(), &line_color))?;

            // 2) Per-month markers.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), point_color)),
            )?;

            // 3) Peak highlight.
            //
            // A colored `Pixel` rather than a `Circle`: the underlying
            // `plotters-ratatui-backend` currently maps circle radii
            // incorrectly (pixel radius -> normalized canvas units), producing
            // huge circles. A pixel gives a clean dot that reliably overrides
            // the base (white) marker.
            if let Some(peak) = self.peak {
                chart.draw_series(std::iter::once(Pixel::new(peak, peak_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Tick label for a month position: the series label at the nearest index,
/// blank between indices.
fn fmt_month_tick(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 0.25 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .cloned()
        .unwrap_or_default()
}

/// Compact arrival counts for the y axis (`1.2M`, `340k`, `950`).
fn fmt_arrivals_tick(v: f64) -> String {
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}
