use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const N_ROWS: usize = 200;
/// Every n-th row gets an empty `radio` cell.
const MISSING_EVERY: usize = 40;
const REGIONS: [&str; 4] = ["north", "south", "east", "west"];

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let output_path = "sample_sales.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["tv", "radio", "newspaper", "region", "sales"])?;

    for row in 0..N_ROWS {
        let tv = rng.gen_range(0.0..300.0_f64);
        let radio = rng.gen_range(0.0..50.0_f64);
        let newspaper = rng.gen_range(0.0..100.0_f64);
        let region = REGIONS[rng.gen_range(0..REGIONS.len())];

        // Sales respond to TV with diminishing returns, radio linearly,
        // newspaper barely.
        let sales = 3.0 + 0.9 * tv.sqrt() + 0.2 * radio + 0.01 * newspaper + gauss(&mut rng, 0.0, 1.0);

        let radio_cell = if (row + 1) % MISSING_EVERY == 0 {
            String::new()
        } else {
            format!("{radio:.1}")
        };

        writer.write_record([
            format!("{tv:.1}"),
            radio_cell,
            format!("{newspaper:.1}"),
            region.to_string(),
            format!("{:.2}", sales.max(0.0)),
        ])?;
    }
    writer.flush().context("flushing CSV writer")?;

    println!(
        "Wrote {N_ROWS} rows ({} with a missing radio value) to {output_path}",
        N_ROWS / MISSING_EVERY
    );
    Ok(())
}
