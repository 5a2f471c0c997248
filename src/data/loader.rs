use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::RouteError;
use super::model::{Route, RouteDataset, RouteRecord};

/// Column names accepted for each route field, preferred name first.
const ORIGIN_COLUMNS: &[&str] = &["origin"];
const DESTINATION_COLUMNS: &[&str] = &["destination", "dest"];
const VOLUME_COLUMNS: &[&str] = &["volume"];
const TARIFF_COLUMNS: &[&str] = &["tariff_impact", "tariffImpact"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// A loaded dataset plus the records that were dropped on the way in.
#[derive(Debug)]
pub struct LoadOutcome {
    pub dataset: RouteDataset,
    pub skipped: Vec<RouteError>,
}

/// Load a route table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columns `origin`, `destination`, `volume`, `tariff_impact`
/// * `.json`    – `[{ "origin": "USA", "destination": "China", ... }, ...]`
/// * `.csv`     – header row with the same column names
///
/// Malformed records are logged and skipped; only file-level problems are
/// returned as errors.
pub fn load_file(path: &Path) -> Result<LoadOutcome> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(collect_routes(rows))
}

/// Keep well-formed records, log and set aside the rest.
fn collect_routes(rows: Vec<Result<Route, RouteError>>) -> LoadOutcome {
    let mut routes = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    for row in rows {
        match row {
            Ok(route) => routes.push(route),
            Err(e) => {
                log::warn!("Skipping record: {e}");
                skipped.push(e);
            }
        }
    }
    LoadOutcome {
        dataset: RouteDataset::from_routes(routes),
        skipped,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "origin": "USA", "destination": "China", "volume": 100, "tariff_impact": 0.25 },
///   ...
/// ]
/// ```
///
/// An object with a `routes` array is accepted too. Duplicate keys inside a
/// record collapse to the last value.
fn load_json(path: &Path) -> Result<Vec<Result<Route, RouteError>>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = match root {
        JsonValue::Array(records) => records,
        JsonValue::Object(mut obj) => match obj.remove("routes") {
            Some(JsonValue::Array(records)) => records,
            _ => bail!("Expected a JSON array or an object with a `routes` array"),
        },
        _ => bail!("Expected top-level JSON array"),
    };

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            if !rec.is_object() {
                return Err(RouteError::malformed(i, "not a JSON object"));
            }
            let record: RouteRecord = serde_json::from_value(rec)
                .map_err(|e| RouteError::malformed(i, e.to_string()))?;
            record.into_route(i)
        })
        .collect())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming `origin`, `destination` (or `dest`),
/// `volume` and `tariff_impact`. Extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<Result<Route, RouteError>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    for names in [ORIGIN_COLUMNS, DESTINATION_COLUMNS, VOLUME_COLUMNS, TARIFF_COLUMNS] {
        if !names.iter().any(|n| headers.iter().any(|h| h == n)) {
            bail!("CSV missing '{}' column", names[0]);
        }
    }

    Ok(reader
        .deserialize::<RouteRecord>()
        .enumerate()
        .map(|(i, result)| {
            result
                .map_err(|e| RouteError::malformed(i, e.to_string()))?
                .into_route(i)
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one route per row.
///
/// Expected schema:
/// - `origin`, `destination` (or `dest`): Utf8 / LargeUtf8
/// - `volume`, `tariff_impact`: Float64, Float32, Int64 or Int32
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Result<Route, RouteError>>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let origin = batch.column(column_index(&schema, ORIGIN_COLUMNS)?);
        let destination = batch.column(column_index(&schema, DESTINATION_COLUMNS)?);
        let volume = batch.column(column_index(&schema, VOLUME_COLUMNS)?);
        let tariff = batch.column(column_index(&schema, TARIFF_COLUMNS)?);

        for row in 0..batch.num_rows() {
            let index = rows.len();
            let record = RouteRecord {
                origin: extract_string(origin, row),
                destination: extract_string(destination, row),
                volume: extract_f64(volume, row),
                tariff_impact: extract_f64(tariff, row),
            };
            rows.push(record.into_route(index));
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

fn column_index(schema: &Schema, names: &[&str]) -> Result<usize> {
    names
        .iter()
        .find_map(|n| schema.index_of(n).ok())
        .with_context(|| format!("Parquet file missing '{}' column", names[0]))
}

/// Read a string cell; `None` for nulls and non-string columns.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|s| s.value(row).to_string()),
        _ => None,
    }
}

/// Read a numeric cell as `f64`; `None` for nulls and non-numeric columns.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col.as_primitive_opt::<Float64Type>().map(|a| a.value(row)),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => col.as_primitive_opt::<Int64Type>().map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| f64::from(a.value(row))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::Field;
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("trade_atlas_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_json_skips_malformed_and_accepts_aliases() {
        let path = temp_file(
            "routes.json",
            r#"[
                {"origin": "USA", "dest": "China", "volume": 100, "tariff_impact": 0.25},
                {"origin": "UK", "dest": "USA", "volume": 65, "volume": 65, "tariff_impact": 0.12},
                {"origin": "India", "destination": "USA", "tariff_impact": 0.18},
                {"origin": "Brazil", "destination": "China", "volume": 60, "tariffImpact": 1.3},
                "not a record"
            ]"#,
        );
        let outcome = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            outcome.dataset.routes,
            vec![
                Route::new("USA", "China", 100.0, 0.25),
                Route::new("UK", "USA", 65.0, 0.12),
            ]
        );
        assert_eq!(outcome.skipped.len(), 3);
        assert_eq!(outcome.skipped[0], RouteError::malformed(2, "missing `volume`"));
    }

    #[test]
    fn test_json_routes_object() {
        let path = temp_file(
            "wrapped.json",
            r#"{"routes": [{"origin": "Japan", "destination": "USA", "volume": 70, "tariff_impact": 0.2}]}"#,
        );
        let outcome = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(outcome.dataset.len(), 1);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_json_rejects_scalar_root() {
        let path = temp_file("scalar.json", "42");
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_csv_loads_and_skips_bad_numbers() {
        let path = temp_file(
            "routes.csv",
            "origin,destination,volume,tariff_impact\n\
             Germany, USA, 80, 0.15\n\
             China,Germany,lots,0.10\n\
             Australia,China,45,0.22\n\
             India,USA,,0.18\n",
        );
        let outcome = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            outcome.dataset.routes,
            vec![
                Route::new("Germany", "USA", 80.0, 0.15),
                Route::new("Australia", "China", 45.0, 0.22),
            ]
        );
        assert_eq!(outcome.skipped.len(), 2);
    }

    #[test]
    fn test_csv_missing_column_is_an_error() {
        let path = temp_file("nocol.csv", "origin,destination,volume\nUSA,China,100\n");
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("tariff_impact"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("routes.xlsx")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file extension: .xlsx");
    }

    #[test]
    fn test_parquet_round_trip_with_integer_volume() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("origin", DataType::Utf8, false),
            Field::new("dest", DataType::Utf8, false),
            Field::new("volume", DataType::Int64, true),
            Field::new("tariff_impact", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["USA", "Japan"])),
                Arc::new(StringArray::from(vec!["China", "USA"])),
                Arc::new(Int64Array::from(vec![Some(100), None])),
                Arc::new(Float64Array::from(vec![0.25, 0.20])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!(
            "trade_atlas_{}_routes.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let outcome = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(outcome.dataset.routes, vec![Route::new("USA", "China", 100.0, 0.25)]);
        assert_eq!(outcome.skipped, vec![RouteError::malformed(1, "missing `volume`")]);
    }
}
