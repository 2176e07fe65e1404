use anyhow::{Context, Result};

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

    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // (attraction, neighbourhood, typical monthly visitors)
    let attractions = [
        ("Cristo Redentor", "Alto da Boa Vista", 180_000.0),
        ("Pão de Açúcar", "Urca", 130_000.0),
        ("Maracanã", "Maracanã", 60_000.0),
        ("Museu do Amanhã", "Centro", 45_000.0),
        ("Escadaria Selarón", "Lapa", 35_000.0),
        ("Jardim Botânico", "Jardim Botânico", 25_000.0),
    ];
    let years = [2022, 2023, 2024];

    let output_path = "sample_tourism.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "attraction",
        "neighbourhood",
        "year",
        "month",
        "visitors",
        "avg_ticket_brl",
        "rating",
    ])?;

    let mut rows = 0;
    for year in years {
        for month in 1..=12u32 {
            // Summer months (Dec–Mar) are busier.
            let season = if matches!(month, 12 | 1 | 2 | 3) { 1.35 } else { 0.9 };
            for (name, hood, base) in attractions {
                let visitors = (base * season * rng.range(0.8, 1.2)).round() as i64;
                let ticket = rng.range(20.0, 120.0);
                // Roughly one rating in twenty is left blank.
                let rating = if rng.next_f64() < 0.05 {
                    String::new()
                } else {
                    format!("{:.1}", rng.range(3.5, 5.0))
                };
                writer.write_record([
                    name.to_string(),
                    hood.to_string(),
                    year.to_string(),
                    month.to_string(),
                    visitors.to_string(),
                    format!("{ticket:.2}"),
                    rating,
                ])?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
