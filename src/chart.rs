//! Weight chart rendering
//!
//! Renders a [`WeightSeries`] to PNG bytes with plotters. Actual
//! observations are drawn as filled circles, interpolated gap-fill points
//! as smaller hollow gray circles, so the two are visually distinct.

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::timeline::WeightSeries;

const COLOR_LINE: (u8, u8, u8) = (191, 49, 67);
const COLOR_INTERPOLATED: (u8, u8, u8) = (128, 128, 128);

/// Render the weight trend chart as PNG bytes
pub fn render_weight_chart(
    series: &WeightSeries,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if series.points.is_empty() {
        return Err("No weight data to chart".to_string());
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let y_min = series.points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min) - 2.0;
        let y_max = series.points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max) + 2.0;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..(series.points.len() as i32), y_min..y_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_labels(series.points.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < series.points.len() {
                    let date = &series.points[*x as usize].date;
                    date.split('-').skip(1).collect::<Vec<_>>().join("/")
                } else {
                    String::new()
                }
            })
            .y_desc(series.unit.as_str())
            .draw()
            .map_err(|e| e.to_string())?;

        let line_color = RGBColor(COLOR_LINE.0, COLOR_LINE.1, COLOR_LINE.2);
        let gray = RGBColor(
            COLOR_INTERPOLATED.0,
            COLOR_INTERPOLATED.1,
            COLOR_INTERPOLATED.2,
        );

        let line_points: Vec<(i32, f64)> = series
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as i32, p.value))
            .collect();

        chart
            .draw_series(LineSeries::new(line_points, line_color.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label(format!("Weight ({})", series.unit))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(2))
            });

        // Actual observations: filled markers on the line
        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !p.interpolated)
                    .map(|(i, p)| Circle::new((i as i32, p.value), 4, line_color.filled())),
            )
            .map_err(|e| e.to_string())?;

        // Interpolated gap-fill: smaller hollow markers
        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.interpolated)
                    .map(|(i, p)| Circle::new((i as i32, p.value), 2, gray.stroke_width(1))),
            )
            .map_err(|e| e.to_string())?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    let dyn_img = DynamicImage::ImageRgb8(img);
    dyn_img
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}
