use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Per-species shape of the synthetic table: (name, rows, islands,
/// mean/std of bill length, bill depth, flipper length, body mass).
type SpeciesProfile = (&'static str, usize, &'static [&'static str], [(f64, f64); 4]);

const PROFILES: [SpeciesProfile; 3] = [
    (
        "Adelie",
        152,
        &["Torgersen", "Biscoe", "Dream"],
        [(38.8, 2.7), (18.3, 1.2), (190.0, 6.5), (3700.0, 458.0)],
    ),
    (
        "Gentoo",
        124,
        &["Biscoe"],
        [(47.5, 3.1), (15.0, 1.0), (217.0, 6.5), (5076.0, 504.0)],
    ),
    (
        "Chinstrap",
        68,
        &["Dream"],
        [(48.8, 3.3), (18.4, 1.1), (196.0, 7.1), (3733.0, 384.0)],
    ),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Default)]
struct Columns {
    species: Vec<String>,
    island: Vec<String>,
    measurements: [Vec<Option<f64>>; 4],
    sex: Vec<Option<String>>,
    year: Vec<i64>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();
    let mut row = 0usize;

    for (species, count, islands, stats) in PROFILES {
        for i in 0..count {
            let male = i % 2 == 0;
            let shift = if male { 1.0 } else { -1.0 };
            // roughly one row in sixty is missing every measurement
            let missing = rng.next_f64() < 1.0 / 60.0;

            cols.species.push(species.to_string());
            cols.island.push(islands[i % islands.len()].to_string());
            for (k, &(mean, std_dev)) in stats.iter().enumerate() {
                let value = rng.gauss(mean + shift * std_dev * 0.4, std_dev * 0.8);
                let rounded = if k >= 2 { value.round() } else { (value * 10.0).round() / 10.0 };
                cols.measurements[k].push((!missing).then_some(rounded));
            }
            let sex = if male { "male" } else { "female" };
            cols.sex.push((!missing).then(|| sex.to_string()));
            cols.year.push(2007 + (row % 3) as i64);
            row += 1;
        }
    }
    cols
}

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "species",
        "island",
        "bill_length_mm",
        "bill_depth_mm",
        "flipper_length_mm",
        "body_mass_g",
        "sex",
        "year",
    ])?;
    let na = || "NA".to_string();
    for i in 0..cols.species.len() {
        let mut record = vec![cols.species[i].clone(), cols.island[i].clone()];
        record.extend(
            cols.measurements
                .iter()
                .map(|m| m[i].map(|v| v.to_string()).unwrap_or_else(na)),
        );
        record.push(cols.sex[i].clone().unwrap_or_else(na));
        record.push(cols.year[i].to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(cols: &Columns, path: &str) -> Result<()> {
    let text = |v: &[String]| StringArray::from(v.iter().map(|s| s.as_str()).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Float64, true),
        Field::new("body_mass_g", DataType::Float64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int64, false),
    ]));

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(text(&cols.species)),
        Arc::new(text(&cols.island)),
    ];
    for m in &cols.measurements {
        arrays.push(Arc::new(Float64Array::from(m.clone())));
    }
    arrays.push(Arc::new(StringArray::from(cols.sex.clone())));
    arrays.push(Arc::new(Int64Array::from(cols.year.clone())));

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng);

    let csv_path = "penguins_sample.csv";
    let parquet_path = "penguins_sample.parquet";
    write_csv(&cols, csv_path)?;
    write_parquet(&cols, parquet_path)?;

    println!(
        "Wrote {} penguins to {csv_path} and {parquet_path}",
        cols.species.len()
    );
    Ok(())
}
