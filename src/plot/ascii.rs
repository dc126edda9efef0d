//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - monthly points: `o`
//! - connecting line: `-`

use crate::domain::MonthlyPoint;

/// Render the forecast series as a fixed-grid chart, months left to right.
pub fn render_series_plot(series: &[MonthlyPoint], width: usize, height: usize) -> String {
    if series.is_empty() {
        return "(no forecast data to plot)\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = arrivals_range(series);
    let (lo, hi) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Connect consecutive months first so the markers overlay the line.
    let mut prev: Option<(usize, usize)> = None;
    for (i, point) in series.iter().enumerate() {
        let x = map_x(i, series.len(), width);
        let y = map_y(point.arrivals, lo, hi, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        prev = Some((x, y));
    }

    for (i, point) in series.iter().enumerate() {
        let x = map_x(i, series.len(), width);
        let y = map_y(point.arrivals, lo, hi, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {}..{} ({} months) | arrivals=[{y_min:.0}, {y_max:.0}]\n",
        series[0].label,
        series[series.len() - 1].label,
        series.len(),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn arrivals_range(series: &[MonthlyPoint]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in series {
        min_y = min_y.min(p.arrivals);
        max_y = max_y.max(p.arrivals);
    }
    (min_y, max_y)
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(index: usize, count: usize, width: usize) -> usize {
    let width = width.max(2);
    let denom = (count.max(2) - 1) as f64;
    let u = (index as f64 / denom).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, arrivals: f64) -> MonthlyPoint {
        MonthlyPoint {
            label: label.to_string(),
            arrivals,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let series = vec![point("2026-01", 100.0), point("2026-02", 110.0)];
        let txt = render_series_plot(&series, 10, 5);
        let expected = concat!(
            "Plot: 2026-01..2026-02 (2 months) | arrivals=[100, 110]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_prints_placeholder() {
        assert_eq!(render_series_plot(&[], 10, 5), "(no forecast data to plot)\n");
    }

    #[test]
    fn constant_series_does_not_panic() {
        let series = vec![
            point("2026-01", 500.0),
            point("2026-02", 500.0),
            point("2026-03", 500.0),
        ];
        let txt = render_series_plot(&series, 12, 6);
        assert!(txt.contains('o'));
    }
}
