use std::path::Path;

use plotters::prelude::*;

use super::config::PlotParams;
use super::dataset::{ScanPoint, SimPoint};
use super::error::PlotError;

const PLOT_2D_SIZE: (u32, u32) = (1000, 600);
const PLOT_3D_SIZE: (u32, u32) = (900, 900);

const X_LABEL: &str = "Energy (meV)";
const Y_LABEL: &str = "Scattered Intensity (normalized)";

fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Number of axis labels between min and max for a configured tick step
fn tick_count(min: f64, max: f64, step: f64) -> usize {
    if step > 0.0 && max > min {
        ((max - min) / step).round() as usize + 1
    } else {
        10
    }
}

/// Distinct delta labels in first-appearance order across both datasets.
/// The position in this list fixes the series color of a delta.
fn distinct_deltas(scans: &[ScanPoint], sims: &[SimPoint]) -> Vec<f64> {
    let mut deltas: Vec<f64> = Vec::new();
    for d in scans
        .iter()
        .map(|p| p.delta)
        .chain(sims.iter().map(|p| p.delta))
    {
        if !deltas.iter().any(|seen| seen.to_bits() == d.to_bits()) {
            deltas.push(d);
        }
    }
    deltas
}

fn series_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

/// Render the 2D comparison: measured intensity vs energy as error-bar +
/// scatter series per delta label, with Takin curves overlaid as lines in the
/// matching color.
pub fn plot_2d(
    scans: &[ScanPoint],
    sims: &[SimPoint],
    params: &PlotParams,
    out_path: &Path,
) -> Result<(), PlotError> {
    if scans.is_empty() && sims.is_empty() {
        return Err(PlotError::NoData);
    }

    let root = BitMapBackend::new(out_path, PLOT_2D_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&params.title_2d, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(params.x_min..params.x_max, params.y_min..params.y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_labels(tick_count(params.x_min, params.x_max, params.x_tick))
        .y_labels(tick_count(params.y_min, params.y_max, params.y_tick))
        .draw()
        .map_err(render_err)?;

    let deltas = distinct_deltas(scans, sims);

    for (index, &delta) in deltas.iter().enumerate() {
        let color = series_color(index);
        let points: Vec<&ScanPoint> = scans
            .iter()
            .filter(|p| p.delta.to_bits() == delta.to_bits())
            .filter(|p| p.energy.is_finite() && p.intensity.is_finite() && p.error.is_finite())
            .collect();
        if points.is_empty() {
            continue;
        }

        chart
            .draw_series(points.iter().map(|p| {
                ErrorBar::new_vertical(
                    p.energy,
                    p.intensity - p.error,
                    p.intensity,
                    p.intensity + p.error,
                    color.mix(0.7),
                    4,
                )
            }))
            .map_err(render_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|p| Circle::new((p.energy, p.intensity), 4, color.filled())),
            )
            .map_err(render_err)?
            .label(format!("Δ = {delta}"))
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    for (index, &delta) in deltas.iter().enumerate() {
        let color = series_color(index);
        let mut curve: Vec<(f64, f64)> = sims
            .iter()
            .filter(|p| p.delta.to_bits() == delta.to_bits())
            .filter(|p| p.energy.is_finite() && p.intensity.is_finite())
            .map(|p| (p.energy, p.intensity))
            .collect();
        if curve.is_empty() {
            continue;
        }
        curve.sort_by(|a, b| a.0.total_cmp(&b.0));

        chart
            .draw_series(LineSeries::new(curve, color.mix(0.6)))
            .map_err(render_err)?;
    }

    if !scans.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    log::info!("2D plot saved to {}", out_path.display());
    Ok(())
}

/// Render the 3D comparison: intensity against energy and the delta label as
/// independent axes. Measured points keep their vertical error bars; the
/// simulation becomes a low-opacity scatter.
pub fn plot_3d(
    scans: &[ScanPoint],
    sims: &[SimPoint],
    params: &PlotParams,
    out_path: &Path,
) -> Result<(), PlotError> {
    if scans.is_empty() && sims.is_empty() {
        return Err(PlotError::NoData);
    }

    let root = BitMapBackend::new(out_path, PLOT_3D_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&params.title_3d, ("sans-serif", 24))
        .margin(20)
        .build_cartesian_3d(
            params.x_min..params.x_max,
            params.y_min..params.y_max,
            params.delta_min..params.delta_max,
        )
        .map_err(render_err)?;

    chart.with_projection(|mut pb| {
        pb.pitch = 0.25;
        pb.yaw = 0.7;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()
        .map_err(render_err)?;

    let deltas = distinct_deltas(scans, sims);

    for (index, &delta) in deltas.iter().enumerate() {
        let color = series_color(index);
        let points: Vec<&ScanPoint> = scans
            .iter()
            .filter(|p| p.delta.to_bits() == delta.to_bits())
            .filter(|p| p.energy.is_finite() && p.intensity.is_finite() && p.error.is_finite())
            .collect();
        if points.is_empty() {
            continue;
        }

        chart
            .draw_series(points.iter().map(|p| {
                PathElement::new(
                    vec![
                        (p.energy, p.intensity - p.error, p.delta),
                        (p.energy, p.intensity + p.error, p.delta),
                    ],
                    color.mix(0.5),
                )
            }))
            .map_err(render_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|p| Circle::new((p.energy, p.intensity, p.delta), 3, color.filled())),
            )
            .map_err(render_err)?
            .label(format!("Δ = {delta}"))
            .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
    }

    for (index, &delta) in deltas.iter().enumerate() {
        let color = series_color(index);
        let points: Vec<&SimPoint> = sims
            .iter()
            .filter(|p| p.delta.to_bits() == delta.to_bits())
            .filter(|p| p.energy.is_finite() && p.intensity.is_finite())
            .collect();
        if points.is_empty() {
            continue;
        }

        chart
            .draw_series(points.iter().map(|p| {
                Circle::new(
                    (p.energy, p.intensity, p.delta),
                    2,
                    color.mix(0.4).filled(),
                )
            }))
            .map_err(render_err)?;
    }

    if !scans.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    log::info!("3D plot saved to {}", out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_point(delta: f64) -> ScanPoint {
        ScanPoint {
            energy: 1.0,
            intensity: 1.0,
            error: 0.1,
            delta,
            temperature: 0.3,
        }
    }

    fn sim_point(delta: f64) -> SimPoint {
        SimPoint {
            energy: 1.0,
            intensity: 1.0,
            delta,
            temperature: 0.3,
        }
    }

    #[test]
    fn test_tick_count() {
        assert_eq!(tick_count(0.0, 16.0, 2.0), 9);
        assert_eq!(tick_count(0.0, 0.0018, 0.0005), 5);
        // degenerate steps fall back to a default label count
        assert_eq!(tick_count(0.0, 1.0, 0.0), 10);
        assert_eq!(tick_count(1.0, 0.0, 0.5), 10);
    }

    #[test]
    fn test_distinct_deltas_first_appearance_order() {
        let scans = vec![scan_point(0.0), scan_point(-0.015), scan_point(0.0)];
        let sims = vec![sim_point(-0.03), sim_point(-0.015)];
        assert_eq!(distinct_deltas(&scans, &sims), vec![0.0, -0.015, -0.03]);
    }

    #[test]
    fn test_empty_datasets_refused() {
        let params = PlotParams::default();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.png");
        assert!(matches!(
            plot_2d(&[], &[], &params, &out),
            Err(PlotError::NoData)
        ));
        assert!(matches!(
            plot_3d(&[], &[], &params, &out),
            Err(PlotError::NoData)
        ));
        assert!(!out.exists());
    }
}
