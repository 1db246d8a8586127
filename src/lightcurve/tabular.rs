//! Plain tabular text light-curve encoding.
//!
//! Whitespace-separated columns time/flux/flux_err with an optional fourth
//! quality column. Lines starting with `#` are comments. Simulated curves
//! in this encoding carry no header, so target metadata comes from the
//! task.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::task::Task;

use super::{LightCurve, LightCurveMeta};

pub fn load(path: &Path, task: &Task) -> Result<LightCurve> {
    let contents = fs::read_to_string(path)?;

    let mut time = Vec::new();
    let mut flux = Vec::new();
    let mut flux_err = Vec::new();
    let mut quality = Vec::new();

    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 && fields.len() != 4 {
            return Err(Error::MalformedLightCurve(format!(
                "line {}: expected 3 or 4 columns, found {}",
                lineno + 1,
                fields.len()
            )));
        }

        time.push(parse_float(fields[0], lineno)?);
        flux.push(parse_float(fields[1], lineno)?);
        flux_err.push(parse_float(fields[2], lineno)?);
        quality.push(match fields.get(3) {
            Some(q) => q.parse::<u32>().map_err(|e| {
                Error::MalformedLightCurve(format!("line {}: bad quality flag: {e}", lineno + 1))
            })?,
            None => 0,
        });
    }

    if time.is_empty() {
        return Err(Error::MalformedLightCurve(format!(
            "no samples in {}",
            path.display()
        )));
    }

    // Simulated tabular curves are all from the same nominal pointing.
    let meta = LightCurveMeta {
        starid: Some(task.starid),
        camera: Some(1),
        ccd: Some(1),
        sector: Some(2),
        ..LightCurveMeta::default()
    };

    LightCurve::new(time, flux, flux_err, quality, meta)
}

fn parse_float(field: &str, lineno: usize) -> Result<f64> {
    field.parse::<f64>().map_err(|e| {
        Error::MalformedLightCurve(format!("line {}: bad float '{field}': {e}", lineno + 1))
    })
}
