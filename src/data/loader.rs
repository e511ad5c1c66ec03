use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{COLUMNS, Penguin, PenguinDataset, Species};

/// Synthetic table in the penguins schema, shipped with the binary so the
/// dashboard starts without a data file. Produced by `generate_sample`.
const BUNDLED_CSV: &str = include_str!("../../data/penguins_sample.csv");

/// Source label for [`bundled`].
pub const BUNDLED_SOURCE: &str = "bundled sample (synthetic)";

/// Columns a source must provide; the rest are optional.
const REQUIRED: [&str; 5] = [
    "species",
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse the bundled sample table.
pub fn bundled() -> Result<PenguinDataset> {
    read_csv(BUNDLED_CSV.as_bytes()).context("parsing bundled penguins table")
}

/// Load a penguins table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, `NA` or empty for missing cells
/// * `.json`    – `[{ "species": "Adelie", "bill_length_mm": 39.1, ... }, ...]`
/// * `.parquet` – one column per field (pandas `df.to_parquet()` layout)
pub fn load_file(path: &Path) -> Result<PenguinDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.is_empty() {
        log::warn!("{} contains no rows", path.display());
    }
    Ok(dataset)
}

/// Keep the schema columns present in `headers`, in source order, and make
/// sure the required ones are there.
fn schema_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>> {
    let columns: Vec<String> = headers
        .into_iter()
        .filter(|h| COLUMNS.contains(h))
        .map(str::to_string)
        .collect();
    for required in REQUIRED {
        if !columns.iter().any(|c| c == required) {
            bail!("missing '{required}' column");
        }
    }
    Ok(columns)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; unknown columns are ignored.
fn read_csv<R: Read>(source: R) -> Result<PenguinDataset> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let column_names = schema_columns(headers.iter())?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<Penguin>().enumerate() {
        let penguin = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(penguin);
    }

    Ok(PenguinDataset::from_rows(rows, column_names))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "Adelie", "island": "Torgersen", "bill_length_mm": 39.1, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<PenguinDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let column_names = match records.first().and_then(|r| r.as_object()) {
        Some(first) => schema_columns(
            COLUMNS
                .into_iter()
                .filter(|c| first.contains_key(*c)),
        )?,
        None => COLUMNS.iter().map(|c| c.to_string()).collect(),
    };

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            if !rec.is_object() {
                bail!("Row {i} is not a JSON object");
            }
            serde_json::from_value::<Penguin>(rec.clone()).with_context(|| format!("Row {i}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PenguinDataset::from_rows(rows, column_names))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Numeric columns may be Float64/Float32/Int64/Int32 (pandas writes
/// integer columns containing `NA` as floats). Text columns are Utf8.
fn load_parquet(path: &Path) -> Result<PenguinDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names = schema_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let species_col = column("species").context("Parquet file missing 'species' column")?;

        for row in 0..batch.num_rows() {
            let species_text = extract_string(species_col, row)
                .with_context(|| format!("Row {row}: null species"))?;
            let species: Species = species_text
                .parse()
                .with_context(|| format!("Row {row}"))?;

            let float = |name: &str| column(name).and_then(|c| extract_f64(c, row));
            let text = |name: &str| column(name).and_then(|c| extract_string(c, row));

            rows.push(Penguin {
                species,
                island: text("island").unwrap_or_default(),
                bill_length_mm: float("bill_length_mm"),
                bill_depth_mm: float("bill_depth_mm"),
                flipper_length_mm: float("flipper_length_mm"),
                body_mass_g: float("body_mass_g"),
                sex: text("sex"),
                year: float("year").map(|y| y as i64),
            });
        }
    }

    Ok(PenguinDataset::from_rows(rows, column_names))
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell; `None` for nulls and non-numeric columns.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    }
}

/// Read a text cell; `None` for nulls and non-text columns.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn bundled_table_has_all_species() {
        let ds = bundled().unwrap();
        assert_eq!(ds.column_names, COLUMNS.map(String::from).to_vec());
        for sp in Species::ALL {
            assert!(ds.count_species(sp) > 0, "{sp} missing");
        }
    }

    #[test]
    fn csv_missing_cells_become_none() {
        let text = "species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year\n\
                    Adelie,Torgersen,NA,,NaN,3750,NA,2007\n\
                    Gentoo,Biscoe,46.1,13.2,211,4500,female,2007\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.rows[0];
        assert_eq!(first.bill_length_mm, None);
        assert_eq!(first.bill_depth_mm, None);
        assert_eq!(first.flipper_length_mm, None);
        assert_eq!(first.body_mass_g, Some(3750.0));
        assert_eq!(first.sex, None);
        assert_eq!(ds.rows[1].sex.as_deref(), Some("female"));
    }

    #[test]
    fn csv_keeps_source_column_order_and_drops_unknown_columns() {
        let text = "rowid,body_mass_g,species,bill_depth_mm,bill_length_mm,flipper_length_mm\n\
                    1,3800,Chinstrap,17.9,46.5,192\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(
            ds.column_names,
            vec!["body_mass_g", "species", "bill_depth_mm", "bill_length_mm", "flipper_length_mm"]
        );
        assert_eq!(ds.rows[0].island, "");
    }

    #[test]
    fn csv_without_required_column_is_rejected() {
        let text = "species,bill_length_mm\nAdelie,39.1\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("bill_depth_mm"));
    }

    #[test]
    fn csv_unknown_species_reports_row() {
        let text = "species,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g\n\
                    Adelie,39.1,18.7,181,3750\n\
                    Emperor,90.0,30.0,300,23000\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn json_records_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("penguins.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"[
                {{"species": "Gentoo", "island": "Biscoe", "bill_length_mm": 46.1,
                  "bill_depth_mm": 13.2, "flipper_length_mm": 211, "body_mass_g": 4500,
                  "sex": "female", "year": 2007}},
                {{"species": "Adelie", "island": "Dream", "bill_length_mm": null,
                  "bill_depth_mm": null, "flipper_length_mm": null, "body_mass_g": null,
                  "sex": null, "year": 2009}}
            ]"#
        )
        .unwrap();
        drop(f);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names.len(), COLUMNS.len());
        assert_eq!(ds.rows[0].flipper_length_mm, Some(211.0));
        assert_eq!(ds.rows[1].body_mass_g, None);
        assert_eq!(ds.rows[1].year, Some(2009));
    }

    #[test]
    fn parquet_columns_load_with_nulls() {
        use arrow::array::ArrayRef;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("bill_length_mm", DataType::Float64, true),
            Field::new("bill_depth_mm", DataType::Float64, true),
            Field::new("flipper_length_mm", DataType::Int64, true),
            Field::new("body_mass_g", DataType::Int64, true),
            Field::new("year", DataType::Int64, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["Adelie", "Chinstrap"])),
            Arc::new(Float64Array::from(vec![Some(39.1), None])),
            Arc::new(Float64Array::from(vec![Some(18.7), None])),
            Arc::new(Int64Array::from(vec![Some(181), None])),
            Arc::new(Int64Array::from(vec![Some(3750), Some(3400)])),
            Arc::new(Int64Array::from(vec![2007, 2008])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("penguins.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.column_names,
            vec!["species", "bill_length_mm", "bill_depth_mm", "flipper_length_mm", "body_mass_g", "year"]
        );
        assert_eq!(ds.rows[0].flipper_length_mm, Some(181.0));
        assert_eq!(ds.rows[1].species, Species::Chinstrap);
        assert_eq!(ds.rows[1].bill_length_mm, None);
        assert_eq!(ds.rows[1].body_mass_g, Some(3400.0));
        assert_eq!(ds.rows[1].year, Some(2008));
        assert_eq!(ds.rows[1].island, "");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("penguins.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }
}
