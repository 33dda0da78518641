use std::fs;
use std::path::Path;

use anyhow::Result;
use extreme_events::geometry::primitives::LonLat;
use extreme_events::plugin::EventReport;
use log::info;
use svg::Document;
use svg::node::element::{Group, Polygon, Rectangle};

const EVENT_COLORS: [&str; 6] = [
    "#D9534F", "#F0AD4E", "#5BC0DE", "#5CB85C", "#9B59B6", "#34495E",
];

/// Render the polygons of one step on an equirectangular 360x180 plane.
pub fn reports_to_svg(reports: &[EventReport]) -> Document {
    let mut document = Document::new()
        .set("viewBox", (0.0, 0.0, 360.0, 180.0))
        .add(
            Rectangle::new()
                .set("width", 360)
                .set("height", 180)
                .set("fill", "#F5F5F1"),
        );

    for (k, report) in reports.iter().enumerate() {
        let color = EVENT_COLORS[k % EVENT_COLORS.len()];
        let mut group = Group::new()
            .set("id", format!("event_{k}"))
            .set("data-description", report.description.clone());
        for polygon in &report.polygons {
            group = group.add(
                Polygon::new()
                    .set("points", points_attribute(polygon))
                    .set("fill", color)
                    .set("fill-opacity", 0.4)
                    .set("stroke", color)
                    .set("stroke-width", 0.5),
            );
        }
        document = document.add(group);
    }
    document
}

fn points_attribute(polygon: &[LonLat]) -> String {
    polygon
        .iter()
        .map(|p| format!("{:.3},{:.3}", p.lon().rem_euclid(360.0), 90.0 - p.lat()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_svg(document: &Document, path: &Path) -> Result<()> {
    svg::save(path, document)?;
    info!(
        "polygon SVG written to file://{}",
        fs::canonicalize(path)?.to_str().unwrap_or("?")
    );
    Ok(())
}
