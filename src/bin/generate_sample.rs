use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// SplitMix64 stream; a fixed seed keeps the fixtures reproducible.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    /// Uniform in `[lo, hi)` rounded to one decimal.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + self.unit() * (hi - lo)) * 10.0).round() / 10.0
    }
}

fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn restaurants(rng: &mut SampleRng, n: usize) -> Vec<Vec<String>> {
    let prefixes = ["Golden", "Blue", "Little", "Royal", "Spicy", "Green"];
    let nouns = ["Spoon", "Dragon", "Garden", "Table", "Oven", "Lantern"];
    let cuisines = ["Italian", "Indian", "Chinese", "Mexican", "Thai", "French"];
    let cities = ["Mumbai", "Delhi", "Pune", "Bangalore", "Chennai"];

    (0..n)
        .map(|_| {
            vec![
                format!("{} {}", rng.pick(&prefixes), rng.pick(&nouns)),
                rng.pick(&cuisines).to_string(),
                rng.pick(&cities).to_string(),
                format!("{:.1}", rng.range(2.5, 5.0)),
                format!("{}", 100 + rng.below(1900)),
            ]
        })
        .collect()
}

fn dishes(rng: &mut SampleRng, n: usize) -> Vec<Vec<String>> {
    let names = ["Pasta", "Pizza", "Biryani", "Tacos", "Ramen", "Salad", "Curry"];
    let courses = ["Main", "Starter", "Dessert"];

    (0..n)
        .map(|_| {
            vec![
                rng.pick(&names).to_string(),
                rng.pick(&courses).to_string(),
                format!("{}", 5 + rng.below(20)),
                (rng.unit() < 0.4).to_string(),
            ]
        })
        .collect()
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng(42);

    write_csv(
        &out_dir.join("restro.csv"),
        &["Name", "Cuisine", "City", "Rating", "Cost"],
        &restaurants(&mut rng, 200),
    )?;
    write_csv(
        &out_dir.join("food.csv"),
        &["Name", "Course", "Price", "Vegetarian"],
        &dishes(&mut rng, 50),
    )?;

    Ok(())
}
