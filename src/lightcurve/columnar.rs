//! Structured columnar binary light-curve encoding (Parquet).
//!
//! Columns `time`, `flux`, `flux_err` (Float64) plus an optional `quality`
//! column (UInt32); target metadata travels in the file's key-value
//! metadata. Missing float values read back as NaN and are dropped by the
//! cleaning pass before any spectral computation.

use std::fs::File;
use std::path::Path;

use arrow::array::{Array, Float64Array, UInt32Array};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Error, Result};

use super::{LightCurve, LightCurveMeta};

pub fn load(path: &Path) -> Result<LightCurve> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let meta = read_meta(
        builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .map_or(&[][..], Vec::as_slice),
    );

    let mut time = Vec::new();
    let mut flux = Vec::new();
    let mut flux_err = Vec::new();
    let mut quality = Vec::new();

    let reader = builder.build()?;
    for batch in reader {
        let batch = batch?;
        append_floats(&batch, "time", &mut time)?;
        append_floats(&batch, "flux", &mut flux)?;
        append_floats(&batch, "flux_err", &mut flux_err)?;
        append_quality(&batch, &mut quality)?;
    }

    if time.is_empty() {
        return Err(Error::MalformedLightCurve(format!(
            "no samples in {}",
            path.display()
        )));
    }

    LightCurve::new(time, flux, flux_err, quality, meta)
}

/// Header metadata is best-effort: absent or unparseable entries are left
/// unset, matching how header cards behave in the source archives.
fn read_meta(kv: &[parquet::file::metadata::KeyValue]) -> LightCurveMeta {
    let get = |name: &str| {
        kv.iter()
            .find(|entry| entry.key == name)
            .and_then(|entry| entry.value.as_deref())
    };

    LightCurveMeta {
        starid: get("starid").and_then(|v| v.parse().ok()),
        label: get("object").map(str::to_string),
        sector: get("sector").and_then(|v| v.parse().ok()),
        camera: get("camera").and_then(|v| v.parse().ok()),
        ccd: get("ccd").and_then(|v| v.parse().ok()),
        ra: get("ra").and_then(|v| v.parse().ok()),
        dec: get("dec").and_then(|v| v.parse().ok()),
    }
}

fn append_floats(batch: &RecordBatch, name: &str, out: &mut Vec<f64>) -> Result<()> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| Error::MalformedLightCurve(format!("missing column '{name}'")))?;
    let array = column
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| {
            Error::MalformedLightCurve(format!(
                "column '{name}' is {:?}, expected Float64",
                column.data_type()
            ))
        })?;

    out.reserve(array.len());
    for i in 0..array.len() {
        out.push(if array.is_null(i) {
            f64::NAN
        } else {
            array.value(i)
        });
    }
    Ok(())
}

fn append_quality(batch: &RecordBatch, out: &mut Vec<u32>) -> Result<()> {
    let Some(column) = batch.column_by_name("quality") else {
        out.extend(std::iter::repeat(0).take(batch.num_rows()));
        return Ok(());
    };
    let array = column
        .as_any()
        .downcast_ref::<UInt32Array>()
        .ok_or_else(|| {
            Error::MalformedLightCurve(format!(
                "column 'quality' is {:?}, expected UInt32",
                column.data_type()
            ))
        })?;

    out.reserve(array.len());
    for i in 0..array.len() {
        out.push(if array.is_null(i) { 0 } else { array.value(i) });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;
    use parquet::file::metadata::KeyValue;
    use parquet::file::properties::WriterProperties;
    use std::sync::Arc;

    fn write_fixture(path: &Path, with_quality: bool, kv: Vec<KeyValue>) {
        let mut fields = vec![
            Field::new("time", DataType::Float64, false),
            Field::new("flux", DataType::Float64, true),
            Field::new("flux_err", DataType::Float64, false),
        ];
        if with_quality {
            fields.push(Field::new("quality", DataType::UInt32, false));
        }
        let schema = Arc::new(Schema::new(fields));

        let mut columns: Vec<Arc<dyn Array>> = vec![
            Arc::new(Float64Array::from(vec![0.0, 0.02, 0.04])),
            Arc::new(Float64Array::from(vec![Some(120.0), None, Some(-80.0)])),
            Arc::new(Float64Array::from(vec![1.0, 1.0, 1.0])),
        ];
        if with_quality {
            columns.push(Arc::new(UInt32Array::from(vec![0u32, 0, 8])));
        }
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let props = WriterProperties::builder()
            .set_key_value_metadata(Some(kv))
            .build();
        let file = File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props)).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_reads_columns_and_header_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("star.parquet");
        write_fixture(
            &path,
            true,
            vec![
                KeyValue::new("starid".to_string(), "261136679".to_string()),
                KeyValue::new("sector".to_string(), "2".to_string()),
                KeyValue::new("camera".to_string(), "1".to_string()),
                KeyValue::new("ra".to_string(), "84.29".to_string()),
            ],
        );

        let lc = load(&path).unwrap();
        assert_eq!(lc.len(), 3);
        assert_eq!(lc.meta().starid, Some(261136679));
        assert_eq!(lc.meta().sector, Some(2));
        assert!((lc.meta().ra.unwrap() - 84.29).abs() < 1e-12);
        assert!(lc.meta().dec.is_none());
        // Null flux reads back as NaN.
        assert!(lc.flux()[1].is_nan());
        assert_eq!(lc.quality(), &[0, 0, 8]);
    }

    #[test]
    fn test_missing_quality_column_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("star.parquet");
        write_fixture(&path, false, vec![]);

        let lc = load(&path).unwrap();
        assert_eq!(lc.quality(), &[0, 0, 0]);
    }

    #[test]
    fn test_missing_required_column_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("star.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new(
            "time",
            DataType::Float64,
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![0.0, 1.0]))],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        assert!(matches!(
            load(&path),
            Err(Error::MalformedLightCurve(_))
        ));
    }
}
