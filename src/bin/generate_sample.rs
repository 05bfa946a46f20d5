//! Writes `carbon_data.parquet`: a synthetic emissions table with the same
//! columns as the real dataset, for trying the dashboard without data.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

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

/// (country, region, kilotons in 1990, yearly growth, population in millions)
const COUNTRIES: &[(&str, &str, f64, f64, f64)] = &[
    ("China", "Asia", 2_400_000.0, 0.065, 1_150.0),
    ("United States", "Americas", 5_100_000.0, 0.001, 250.0),
    ("India", "Asia", 600_000.0, 0.055, 870.0),
    ("Russia", "Europe", 2_200_000.0, -0.008, 148.0),
    ("Japan", "Asia", 1_100_000.0, 0.002, 123.0),
    ("Germany", "Europe", 1_000_000.0, -0.012, 79.0),
    ("Brazil", "Americas", 210_000.0, 0.03, 150.0),
    ("Indonesia", "Asia", 150_000.0, 0.05, 180.0),
    ("Canada", "Americas", 460_000.0, 0.008, 28.0),
    ("Mexico", "Americas", 290_000.0, 0.02, 84.0),
    ("South Africa", "Africa", 310_000.0, 0.012, 37.0),
    ("Nigeria", "Africa", 45_000.0, 0.04, 95.0),
    ("Egypt", "Africa", 80_000.0, 0.04, 57.0),
    ("Kenya", "Africa", 6_000.0, 0.05, 23.0),
    ("Australia", "Oceania", 280_000.0, 0.01, 17.0),
    ("New Zealand", "Oceania", 25_000.0, 0.008, 3.4),
    ("Saudi Arabia", "Middle East", 170_000.0, 0.04, 16.0),
    ("Iran", "Middle East", 200_000.0, 0.04, 56.0),
    ("France", "Europe", 390_000.0, -0.006, 58.0),
    ("Norway", "Europe", 35_000.0, 0.002, 4.2),
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let years: Vec<i64> = (1990..=2020).collect();

    let mut all_country: Vec<&str> = Vec::new();
    let mut all_region: Vec<&str> = Vec::new();
    let mut all_year: Vec<i64> = Vec::new();
    let mut all_kilotons: Vec<f64> = Vec::new();
    let mut all_per_capita: Vec<f64> = Vec::new();

    for &year in &years {
        let t = (year - years[0]) as f64;
        for &(country, region, base, growth, population_m) in COUNTRIES {
            let trend = base * (1.0 + growth).powf(t);
            let kilotons = (trend * (1.0 + rng.gauss(0.0, 0.03))).max(0.0);
            let population = population_m * 1e6 * (1.0 + 0.01 * t);
            // 1 kiloton = 1000 metric tons
            let per_capita = kilotons * 1_000.0 / population;

            all_country.push(country);
            all_region.push(region);
            all_year.push(year);
            all_kilotons.push(kilotons.round());
            all_per_capita.push((per_capita * 100.0).round() / 100.0);
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Kilotons of Co2", DataType::Float64, false),
        Field::new("Metric Tons Per Capita", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(all_country)),
            Arc::new(StringArray::from(all_region)),
            Arc::new(Int64Array::from(all_year)),
            Arc::new(Float64Array::from(all_kilotons)),
            Arc::new(Float64Array::from(all_per_capita)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "carbon_data.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    let preview = pretty_format_batches(&[batch.slice(0, 5)]).expect("Failed to format preview");
    println!("{preview}");
    println!(
        "Wrote {} records ({} countries, {} years) to {output_path}",
        batch.num_rows(),
        COUNTRIES.len(),
        years.len()
    );
}
