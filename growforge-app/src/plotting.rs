//! Renders the per-school comparison charts.

use anyhow::Result;
use growforge_core::{
    analysis::{self, EnvironmentSummary, GrowthSummary},
    Dataset,
};
use growforge_schemas::{environment::EnvironmentMetric, growth::GrowthMetric, school::School};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

const CHART_SIZE: (u32, u32) = (1200, 900);
const BAR_MARGIN: u32 = 12;

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders every chart the dataset supports and returns the files written.
pub fn generate_all_plots(output_dir: &Path, dataset: &Dataset) -> Result<Vec<PathBuf>> {
    println!("[Plotting] Generating charts...");
    let mut written = Vec::new();

    let environment = analysis::environment_summary(dataset);
    if environment.is_empty() {
        warn!("No environment data to plot");
    } else {
        let path = output_dir.join("1_environment_comparison.png");
        plot_environment(&path, &environment)?;
        written.push(path);
    }

    if dataset.has_growth() {
        let path = output_dir.join("2_growth_comparison.png");
        plot_growth(&path, &analysis::growth_summary(dataset))?;
        written.push(path);
    } else {
        warn!("Growth data unavailable, skipping growth chart");
    }

    println!("[Plotting] {} chart(s) saved to '{}'.", written.len(), output_dir.display());
    Ok(written)
}

/// `#RRGGBB` to a plotters color; malformed channels fall back to grey.
pub fn school_color(school: School) -> RGBColor {
    let hex = school.color().trim_start_matches('#');
    let channel = |at: usize| {
        hex.get(at..at + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(128)
    };
    RGBColor(channel(0), channel(2), channel(4))
}

fn axis_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let max = values.into_iter().filter(|v| v.is_finite()).fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.15
    } else {
        1.0
    }
}

/// Environment 2x2: mean temperature, humidity, pH, then target vs measured EC.
fn plot_environment(path: &Path, summary: &[EnvironmentSummary]) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    let metrics = [
        EnvironmentMetric::Temperature,
        EnvironmentMetric::Humidity,
        EnvironmentMetric::Ph,
    ];
    for (panel, metric) in panels.iter().zip(metrics) {
        let bars: Vec<(School, Option<f64>)> =
            summary.iter().map(|s| (s.school, s.metric(metric))).collect();
        draw_bar_panel(panel, &format!("Mean {}", metric.label()), &bars)?;
    }
    draw_ec_panel(&panels[3], summary)?;

    root.present()?;
    Ok(())
}

/// Growth 2x2: mean fresh weight, leaf count, shoot length, then specimen count.
fn plot_growth(path: &Path, summary: &[GrowthSummary]) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    for (panel, metric) in panels.iter().zip(GrowthMetric::ALL) {
        let bars: Vec<(School, Option<f64>)> =
            summary.iter().map(|s| (s.school, s.metric(metric))).collect();
        draw_bar_panel(panel, &format!("Mean {}", metric.label()), &bars)?;
    }
    let counts: Vec<(School, Option<f64>)> =
        summary.iter().map(|s| (s.school, Some(s.count as f64))).collect();
    draw_bar_panel(&panels[3], "Specimens", &counts)?;

    root.present()?;
    Ok(())
}

/// One bar per school on a segmented axis labelled with school names.
fn draw_bar_panel(panel: &Panel, title: &str, bars: &[(School, Option<f64>)]) -> Result<()> {
    let names: Vec<&str> = bars.iter().map(|(school, _)| school.name()).collect();
    let y_max = axis_max(bars.iter().filter_map(|(_, v)| *v));

    let mut chart = ChartBuilder::on(panel)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d((0..names.len() as i32).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| segment_label(&names, v))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().filter_map(|(i, (school, value))| {
        let value = (*value)?;
        let i = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), value)],
            school_color(*school).filled(),
        );
        bar.set_margin(0, 0, BAR_MARGIN, BAR_MARGIN);
        Some(bar)
    }))?;

    Ok(())
}

/// Target and measured EC side by side within each school's segment.
fn draw_ec_panel(panel: &Panel, summary: &[EnvironmentSummary]) -> Result<()> {
    let names: Vec<&str> = summary.iter().map(|s| s.school.name()).collect();
    let y_max = axis_max(
        summary
            .iter()
            .flat_map(|s| [Some(s.ec_target), s.ec_measured])
            .flatten(),
    );

    let mut chart = ChartBuilder::on(panel)
        .caption("Target vs measured EC", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d((0..names.len() as i32).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| segment_label(&names, v))
        .draw()?;

    let segment_px = chart.plotting_area().dim_in_pixel().0 / names.len().max(1) as u32;
    let half = segment_px / 2;

    let target_color = RGBColor(160, 160, 160);
    chart
        .draw_series(summary.iter().enumerate().map(|(i, s)| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), s.ec_target)],
                target_color.filled(),
            );
            bar.set_margin(0, 0, BAR_MARGIN / 2, half);
            bar
        }))?
        .label("Target")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], target_color.filled()));

    chart
        .draw_series(summary.iter().enumerate().filter_map(|(i, s)| {
            let measured = s.ec_measured?;
            let i = i as i32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), measured)],
                school_color(s.school).filled(),
            );
            bar.set_margin(0, 0, half, BAR_MARGIN / 2);
            Some(bar)
        }))?
        .label("Measured")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLACK.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn segment_label(names: &[&str], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => names.get(*i as usize).map(|n| n.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_colors_parse_from_hex() {
        assert_eq!(school_color(School::Songdo), RGBColor(0xAB, 0x63, 0xFA));
        assert_eq!(school_color(School::Dongsan), RGBColor(0xEF, 0x55, 0x3B));
    }

    #[test]
    fn axis_leaves_headroom_and_never_collapses() {
        assert_eq!(axis_max(std::iter::empty()), 1.0);
        assert_eq!(axis_max([0.0, f64::NAN]), 1.0);
        assert!((axis_max([2.0, 4.0]) - 4.6).abs() < 1e-9);
    }

    #[test]
    fn only_segment_centers_are_labelled() {
        let names = ["송도고", "하늘고"];
        assert_eq!(segment_label(&names, &SegmentValue::CenterOf(1)), "하늘고");
        assert_eq!(segment_label(&names, &SegmentValue::Exact(1)), "");
        assert_eq!(segment_label(&names, &SegmentValue::CenterOf(5)), "");
    }
}
