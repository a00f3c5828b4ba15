//! Diagnostic plots for a training run.
//!
//! Renders a four-panel SVG from the training record: the fitted line over
//! the raw data, the error curve, the learning-rate curve, and the theta
//! trajectories. Purely a consumer of [`TrainingRecord`]; training does not
//! depend on it.

use std::path::Path;

use plotters::prelude::*;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::model::Theta;
use crate::trainer::TrainingRecord;

pub fn render<P: AsRef<Path>>(
    path: P,
    dataset: &Dataset,
    theta: &Theta,
    record: &TrainingRecord,
) -> Result<()> {
    if record.is_empty() {
        return Err(Error::Plot("training record is empty".to_string()));
    }
    render_panels(path.as_ref(), dataset, theta, record)
        .map_err(|e| Error::Plot(e.to_string()))
}

fn render_panels(
    path: &Path,
    dataset: &Dataset,
    theta: &Theta,
    record: &TrainingRecord,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (1100, 1100)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    draw_fit(&panels[0], dataset, theta)?;
    draw_curve(
        &panels[1],
        "Error over time",
        "Error",
        record.iter().map(|s| s.error),
    )?;
    draw_curve(
        &panels[2],
        "Learning rate over time",
        "Learning rate",
        record.iter().map(|s| s.learning_rate),
    )?;
    draw_theta(&panels[3], record)?;

    root.present()?;
    Ok(())
}

fn draw_fit(
    area: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    dataset: &Dataset,
    theta: &Theta,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let x_max = dataset.mileage().iter().copied().fold(f64::MIN, f64::max);
    let y_max = dataset.price().iter().copied().fold(f64::MIN, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption("Best fit line", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max * 1.05, 0.0..y_max * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Mileage")
        .y_desc("Price")
        .draw()?;

    chart.draw_series(
        dataset
            .mileage()
            .iter()
            .zip(dataset.price().iter())
            .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;

    chart.draw_series(LineSeries::new(
        [0.0, x_max].map(|x| (x, theta.predict(x))),
        &RED,
    ))?;

    Ok(())
}

fn draw_curve(
    area: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    title: &str,
    y_desc: &str,
    values: impl Iterator<Item = f64>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let values: Vec<f64> = values.collect();
    let y_max = values.iter().copied().fold(f64::MIN, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..values.len() as f64, 0.0..y_max * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(LineSeries::new(
        values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
        &GREEN,
    ))?;

    Ok(())
}

fn draw_theta(
    area: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    record: &TrainingRecord,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (mut lo, mut hi) = (f64::MAX, f64::MIN);
    for s in record.iter() {
        lo = lo.min(s.t0.min(s.t1));
        hi = hi.max(s.t0.max(s.t1));
    }

    let mut chart = ChartBuilder::on(area)
        .caption("Theta values over time", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..record.len() as f64, lo - 0.1..hi + 0.1)?;

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("Theta value")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            record.iter().enumerate().map(|(i, s)| (i as f64, s.t0)),
            &RED,
        ))?
        .label("t0")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(LineSeries::new(
            record.iter().enumerate().map(|(i, s)| (i as f64, s.t1)),
            &BLUE,
        ))?
        .label("t1")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart.configure_series_labels().draw()?;

    Ok(())
}
