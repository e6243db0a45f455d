//! Rendering of figure descriptions.
//!
//! Figures are plain data: named line series with labels. A `Renderer` turns
//! them into something visible. Rendering is off by default, in which case
//! `NullRenderer` only counts what it was handed.

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const FONT: &str = "sans-serif";

/// Text sizes and image dimensions handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Caption, axis description and legend size
    pub font_size: u32,
    /// Tick label size
    pub tick_size: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_size: 10,
            tick_size: 10,
            width: 1024,
            height: 768,
        }
    }
}

/// Series colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const RED: Rgb = Rgb(220, 20, 60);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Colour for the `i`-th particle: green, blue, then a fixed cycle.
    pub fn for_particle(i: usize) -> Rgb {
        const CYCLE: [Rgb; 4] = [Rgb::GREEN, Rgb::BLUE, Rgb::RED, Rgb::BLACK];
        CYCLE[i % CYCLE.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series2d {
    pub label: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series3d {
    pub label: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    Lines(Vec<Series2d>),
    Lines3d(Vec<Series3d>),
}

/// One figure, independent of any plotting backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// File stem when written to disk
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub plot: Plot,
}

impl Figure {
    pub fn lines(name: &str, title: String, x_label: &str, y_label: &str, series: Vec<Series2d>) -> Self {
        Self {
            name: name.to_string(),
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            z_label: String::new(),
            plot: Plot::Lines(series),
        }
    }

    pub fn lines_3d(name: &str, title: String, series: Vec<Series3d>) -> Self {
        Self {
            name: name.to_string(),
            title,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            z_label: "z".to_string(),
            plot: Plot::Lines3d(series),
        }
    }

    pub fn series_count(&self) -> usize {
        match &self.plot {
            Plot::Lines(series) => series.len(),
            Plot::Lines3d(series) => series.len(),
        }
    }
}

/// Something that can display or persist a figure.
pub trait Renderer {
    fn render(&mut self, figure: &Figure) -> Result<()>;
}

/// Rendering disabled. Figures are counted and dropped.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub skipped: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        debug!(figure = %figure.name, series = figure.series_count(), "rendering disabled, skipping");
        self.skipped += 1;
        Ok(())
    }
}

/// Writes each figure as `<output_dir>/<name>.png`.
#[derive(Debug, Clone)]
pub struct PngRenderer {
    output_dir: PathBuf,
    style: PlotStyle,
}

impl PngRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, style: PlotStyle) -> Self {
        Self {
            output_dir: output_dir.into(),
            style,
        }
    }

    fn draw_lines(
        &self,
        path: &Path,
        figure: &Figure,
        series: &[Series2d],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let style = self.style;
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
        let y_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));

        let mut chart = ChartBuilder::on(&root)
            .caption(&figure.title, (FONT, style.font_size * 2).into_font())
            .margin(style.height / 30)
            .x_label_area_size(style.height / 15)
            .y_label_area_size(style.width / 12)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .axis_desc_style((FONT, style.font_size).into_font())
            .x_label_style((FONT, style.tick_size).into_font())
            .y_label_style((FONT, style.tick_size).into_font())
            .draw()?;

        for s in series {
            let color = RGBColor(s.color.0, s.color.1, s.color.2);
            chart
                .draw_series(LineSeries::new(
                    s.points.iter().copied().filter(|p| p.0.is_finite() && p.1.is_finite()),
                    ShapeStyle::from(&color).stroke_width(1),
                ))?
                .label(s.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&color).stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .label_font((FONT, style.font_size).into_font())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    fn draw_lines_3d(
        &self,
        path: &Path,
        figure: &Figure,
        series: &[Series3d],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let style = self.style;
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
        let y_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
        let z_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.2)));

        // plotters draws its second axis upwards, so trap z goes there
        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} ({}, {}, {})", figure.title, figure.x_label, figure.z_label, figure.y_label),
                (FONT, style.font_size * 2).into_font(),
            )
            .margin(style.height / 30)
            .build_cartesian_3d(x_range, z_range, y_range)?;

        chart.with_projection(|mut pb| {
            pb.yaw = 0.6;
            pb.pitch = 0.3;
            pb.scale = 0.85;
            pb.into_matrix()
        });

        chart
            .configure_axes()
            .label_style((FONT, style.tick_size).into_font())
            .draw()?;

        for s in series {
            let color = RGBColor(s.color.0, s.color.1, s.color.2);
            chart
                .draw_series(LineSeries::new(
                    s.points
                        .iter()
                        .filter(|p| p.0.is_finite() && p.1.is_finite() && p.2.is_finite())
                        .map(|&(x, y, z)| (x, z, y)),
                    ShapeStyle::from(&color).stroke_width(1),
                ))?
                .label(s.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&color).stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .label_font((FONT, style.font_size).into_font())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Renderer for PngRenderer {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let path = self.output_dir.join(format!("{}.png", figure.name));
        let drawn = match &figure.plot {
            Plot::Lines(series) => self.draw_lines(&path, figure, series),
            Plot::Lines3d(series) => self.draw_lines_3d(&path, figure, series),
        };
        drawn.map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))?;
        debug!(path = %path.display(), "wrote figure");
        Ok(())
    }
}

/// Range covering every finite value with a 5 % margin on each side.
///
/// Falls back to -1..1 when nothing finite is present and widens a zero-width
/// span so the chart still has an extent.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        warn!("no finite data points, using a unit range");
        return -1.0..1.0;
    }
    if min == max {
        let half = if min == 0.0 { 1.0 } else { 0.5 * min.abs() };
        return (min - half)..(max + half);
    }

    let margin = 0.05 * (max - min);
    (min - margin)..(max + margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_padded_range() {
        let r = padded_range([0.0, 10.0, 5.0].into_iter());
        assert_relative_eq!(r.start, -0.5);
        assert_relative_eq!(r.end, 10.5);

        let r = padded_range([2.0, f64::NAN, 2.0, f64::INFINITY].into_iter());
        assert_relative_eq!(r.start, 1.0);
        assert_relative_eq!(r.end, 3.0);

        let r = padded_range([0.0].into_iter());
        assert_eq!(r, -1.0..1.0);

        let r = padded_range(std::iter::empty());
        assert_eq!(r, -1.0..1.0);
    }

    #[test]
    fn test_null_renderer_counts() {
        let figure = Figure::lines(
            "demo",
            "Demo".to_string(),
            "t",
            "z",
            vec![Series2d {
                label: "z".to_string(),
                color: Rgb::GREEN,
                points: vec![(0.0, 1.0), (1.0, 0.5)],
            }],
        );
        let mut renderer = NullRenderer::default();
        renderer.render(&figure).unwrap();
        renderer.render(&figure).unwrap();
        assert_eq!(renderer.skipped, 2);
        assert_eq!(figure.series_count(), 1);
    }

    #[test]
    fn test_png_renderer_writes_files() {
        let dir = std::env::temp_dir().join(format!("penning_plot_render_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let style = PlotStyle {
            width: 320,
            height: 240,
            ..PlotStyle::default()
        };
        let mut renderer = PngRenderer::new(&dir, style);

        let flat = Figure::lines(
            "flat",
            "Flat".to_string(),
            "t",
            "z",
            vec![Series2d {
                label: "z".to_string(),
                color: Rgb::GREEN,
                points: (0..50).map(|i| (i as f64 * 0.1, (i as f64 * 0.1).cos())).collect(),
            }],
        );
        let helix = Figure::lines_3d(
            "helix",
            "Helix".to_string(),
            vec![Series3d {
                label: "particle 1".to_string(),
                color: Rgb::BLUE,
                points: (0..50)
                    .map(|i| {
                        let t = i as f64 * 0.2;
                        (t.cos(), t.sin(), 0.1 * t)
                    })
                    .collect(),
            }],
        );

        renderer.render(&flat).unwrap();
        renderer.render(&helix).unwrap();
        assert!(dir.join("flat.png").exists());
        assert!(dir.join("helix.png").exists());
    }

    #[test]
    fn test_particle_colours() {
        assert_eq!(Rgb::for_particle(0), Rgb::GREEN);
        assert_eq!(Rgb::for_particle(1), Rgb::BLUE);
        assert_eq!(Rgb::for_particle(5), Rgb::BLUE);
    }

    #[test]
    fn test_default_style() {
        let style = PlotStyle::default();
        assert_eq!(style.font_size, 10);
        assert_eq!(style.tick_size, 10);
    }
}
