use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::chart::{HistogramChart, ScatterChart};
use crate::color::SpeciesColors;
use crate::error::RenderError;

const PLOT_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Render a histogram sink, or its failure in place of the chart.
pub fn histogram(ui: &mut Ui, id: &str, chart: &Result<HistogramChart, RenderError>, color: Color32) {
    let chart = match chart {
        Ok(chart) => chart,
        Err(e) => {
            render_failure(ui, e);
            return;
        }
    };

    ui.heading(&chart.title);
    if chart.is_empty() {
        ui.label(RichText::new("No data for the current selection.").italics());
        return;
    }

    let bars: Vec<Bar> = chart
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.2} – {:.2}", bin.start, bin.end))
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.attribute.column())
        .y_axis_label("count")
        .include_y(0.0)
        .include_y(chart.max_count() as f64 * 1.1)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(chart.attribute.label()).color(color));
        });
}

// ---------------------------------------------------------------------------
// Scatterplot
// ---------------------------------------------------------------------------

pub fn scatterplot(ui: &mut Ui, chart: &ScatterChart, colors: &SpeciesColors) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(&chart.title);
        ui.label(format!("{} points", chart.point_count()));
    });
    if chart.series.is_empty() {
        ui.label(RichText::new("No data for the current selection.").italics());
        return;
    }

    Plot::new("scatterplot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x.label())
        .y_axis_label(chart.y.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(series.species.as_str())
                        .color(colors.color_for(series.species))
                        .radius(3.0),
                );
            }
        });
}

fn render_failure(ui: &mut Ui, err: &RenderError) {
    ui.group(|ui: &mut Ui| {
        ui.label(RichText::new("Render failed").strong().color(Color32::RED));
        ui.label(err.to_string());
    });
}
