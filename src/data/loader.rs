use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int32Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{
    EmissionsDataset, EmissionsRecord, COL_COUNTRY, COL_KILOTONS, COL_PER_CAPITA, COL_REGION,
    COL_YEAR,
};
use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an emissions dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – `df.to_parquet()` output (recommended)
/// * `.json`    – `df.to_json(orient="records")` output
/// * `.csv`     – header row with the five column names
pub fn load_file(path: &Path) -> Result<EmissionsDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(SchemaError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} records from {} ({} years, {} regions, {} countries)",
        dataset.len(),
        path.display(),
        dataset.years.len(),
        dataset.regions.len(),
        dataset.countries.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row-oriented formats (JSON, CSV)
// ---------------------------------------------------------------------------

/// One row as it appears in JSON / CSV. Every field is optional so that a
/// missing cell can be reported with its row number instead of a serde
/// message. `Year` is read as a number because pandas writes `2020.0` for a
/// float column.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Region")]
    region: Option<String>,
    #[serde(rename = "Year")]
    year: Option<f64>,
    #[serde(rename = "Kilotons of Co2")]
    kilotons: Option<f64>,
    #[serde(rename = "Metric Tons Per Capita")]
    per_capita: Option<f64>,
}

impl RawRecord {
    fn into_record(self, row: usize) -> Result<EmissionsRecord, SchemaError> {
        let missing = |column: &'static str| SchemaError::MissingValue { row, column };
        Ok(EmissionsRecord {
            country: self
                .country
                .filter(|s| !s.is_empty())
                .ok_or_else(|| missing(COL_COUNTRY))?,
            region: self
                .region
                .filter(|s| !s.is_empty())
                .ok_or_else(|| missing(COL_REGION))?,
            year: match self.year {
                None => return Err(missing(COL_YEAR)),
                Some(y) => whole_year(y).ok_or_else(|| SchemaError::InvalidValue {
                    row,
                    column: COL_YEAR,
                    value: y.to_string(),
                })?,
            },
            kilotons: self.kilotons.unwrap_or(f64::NAN),
            per_capita: self.per_capita.unwrap_or(f64::NAN),
        })
    }
}

/// `2020.0` → `2020`; fractional or out-of-range years are rejected.
fn whole_year(value: f64) -> Option<i32> {
    let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value);
    (value.fract() == 0.0 && in_range).then_some(value as i32)
}

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "Country": "China",
///     "Region": "Asia",
///     "Year": 2020,
///     "Kilotons of Co2": 10944686.0,
///     "Metric Tons Per Capita": 7.61
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<EmissionsDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawRecord> = serde_json::from_str(&text).context("parsing JSON")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record(i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EmissionsDataset::from_records(records))
}

fn load_csv(path: &Path) -> Result<EmissionsDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for column in [COL_COUNTRY, COL_REGION, COL_YEAR, COL_KILOTONS, COL_PER_CAPITA] {
        if !headers.iter().any(|h| h == column) {
            return Err(SchemaError::MissingColumn(column).into());
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.into_record(row_no)?);
    }

    Ok(EmissionsDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of emissions records.
///
/// String columns may be Utf8, LargeUtf8 or dictionary-encoded; numeric
/// columns may be any integer or float width. Works with files written by
/// both Pandas and Polars.
fn load_parquet(path: &Path) -> Result<EmissionsDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();

        let country_col = string_column(&batch, COL_COUNTRY)?;
        let region_col = string_column(&batch, COL_REGION)?;
        let year_col = numeric_column(&batch, COL_YEAR, &DataType::Int32)?;
        let kilotons_col = numeric_column(&batch, COL_KILOTONS, &DataType::Float64)?;
        let per_capita_col = numeric_column(&batch, COL_PER_CAPITA, &DataType::Float64)?;

        let countries = country_col.as_string::<i32>();
        let regions = region_col.as_string::<i32>();
        let years = year_col.as_primitive::<Int32Type>();
        let kilotons = kilotons_col.as_primitive::<Float64Type>();
        let per_capita = per_capita_col.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            let missing = |column: &'static str| SchemaError::MissingValue {
                row: offset + row,
                column,
            };
            if countries.is_null(row) {
                return Err(missing(COL_COUNTRY).into());
            }
            if regions.is_null(row) {
                return Err(missing(COL_REGION).into());
            }
            if years.is_null(row) {
                return Err(missing(COL_YEAR).into());
            }

            records.push(EmissionsRecord {
                country: countries.value(row).to_string(),
                region: regions.value(row).to_string(),
                year: years.value(row),
                kilotons: float_or_nan(kilotons.is_null(row), kilotons.value(row)),
                per_capita: float_or_nan(per_capita.is_null(row), per_capita.value(row)),
            });
        }
    }

    Ok(EmissionsDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn float_or_nan(is_null: bool, value: f64) -> f64 {
    if is_null {
        f64::NAN
    } else {
        value
    }
}

fn string_column(batch: &RecordBatch, name: &'static str) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .ok_or(SchemaError::MissingColumn(name))?;
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View | DataType::Dictionary(..) => {
            cast(col.as_ref(), &DataType::Utf8)
                .with_context(|| format!("casting '{name}' to Utf8"))
        }
        other => Err(SchemaError::UnexpectedType {
            column: name,
            found: format!("{other:?}"),
            expected: "string",
        }
        .into()),
    }
}

fn numeric_column(batch: &RecordBatch, name: &'static str, to: &DataType) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .ok_or(SchemaError::MissingColumn(name))?;
    if !col.data_type().is_numeric() {
        return Err(SchemaError::UnexpectedType {
            column: name,
            found: format!("{:?}", col.data_type()),
            expected: "numeric",
        }
        .into());
    }
    cast(col.as_ref(), to).with_context(|| format!("casting '{name}' to {to:?}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float32Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn schema_error(err: &anyhow::Error) -> Option<&SchemaError> {
        err.chain().find_map(|e| e.downcast_ref::<SchemaError>())
    }

    #[test]
    fn loads_records_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "carbon.json",
            r#"[
                {"Country": "China", "Region": "Asia", "Year": 2020,
                 "Kilotons of Co2": 10000.0, "Metric Tons Per Capita": 7.0},
                {"Country": "India", "Region": "Asia", "Year": 2020,
                 "Kilotons of Co2": 3000, "Metric Tons Per Capita": null}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0], EmissionsRecord::new("China", "Asia", 2020, 10_000.0, 7.0));
        assert_eq!(ds.records[1].kilotons, 3_000.0);
        assert!(ds.records[1].per_capita.is_nan());
    }

    #[test]
    fn json_row_without_country_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "bad.json",
            r#"[{"Region": "Asia", "Year": 2020,
                 "Kilotons of Co2": 1.0, "Metric Tons Per Capita": 1.0}]"#,
        );

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            schema_error(&err),
            Some(&SchemaError::MissingValue {
                row: 0,
                column: COL_COUNTRY,
            })
        );
    }

    #[test]
    fn loads_csv_with_extra_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "carbon.csv",
            ",Country,Region,Year,Kilotons of Co2,Metric Tons Per Capita\n\
             0,China,Asia,2020,10000.0,7.0\n\
             1,United States,Americas,2020,5000.0,\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.countries, vec!["China", "United States"]);
        assert!(ds.records[1].per_capita.is_nan());
    }

    #[test]
    fn float_years_load_from_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_file(
            &dir,
            "carbon.csv",
            "Country,Region,Year,Kilotons of Co2,Metric Tons Per Capita\n\
             China,Asia,2020.0,10000.0,7.0\n\
             India,Asia,2019,3000.0,2.0\n",
        );
        let json_path = write_file(
            &dir,
            "carbon.json",
            r#"[{"Country": "China", "Region": "Asia", "Year": 2020.0,
                 "Kilotons of Co2": 10000.0, "Metric Tons Per Capita": 7.0}]"#,
        );

        assert_eq!(load_file(&csv_path).unwrap().years, vec![2020, 2019]);
        assert_eq!(load_file(&json_path).unwrap().records[0].year, 2020);
    }

    #[test]
    fn fractional_year_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "carbon.csv",
            "Country,Region,Year,Kilotons of Co2,Metric Tons Per Capita\n\
             China,Asia,2020.5,10000.0,7.0\n",
        );

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            schema_error(&err),
            Some(&SchemaError::InvalidValue {
                row: 0,
                column: COL_YEAR,
                value: "2020.5".into(),
            })
        );
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "carbon.csv", "Country,Region,Year\nChina,Asia,2020\n");

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            schema_error(&err),
            Some(&SchemaError::MissingColumn(COL_KILOTONS))
        );
    }

    #[test]
    fn loads_parquet_with_mixed_numeric_widths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carbon.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_COUNTRY, DataType::Utf8, false),
            Field::new(COL_REGION, DataType::Utf8, false),
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_KILOTONS, DataType::Float64, true),
            Field::new(COL_PER_CAPITA, DataType::Float32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["China", "India"])),
                Arc::new(StringArray::from(vec!["Asia", "Asia"])),
                Arc::new(Int64Array::from(vec![2020, 2019])),
                Arc::new(Float64Array::from(vec![Some(10_000.0), None])),
                Arc::new(Float32Array::from(vec![Some(7.5), Some(2.0)])),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.years, vec![2020, 2019]);
        assert_eq!(ds.records[0].kilotons, 10_000.0);
        assert_eq!(ds.records[0].per_capita, 7.5);
        assert!(ds.records[1].kilotons.is_nan());
    }

    #[test]
    fn unsupported_extension_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let pickle = write_file(&dir, "carbon_data.pkl", "not readable");
        let err = load_file(&pickle).unwrap_err();
        assert_eq!(
            schema_error(&err),
            Some(&SchemaError::UnsupportedExtension("pkl".into()))
        );

        assert!(load_file(&dir.path().join("absent.parquet")).is_err());
    }
}
