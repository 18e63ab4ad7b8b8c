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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// (brand, OS, base price in INR)
const BRANDS: [(&str, &str, f64); 7] = [
    ("Apple", "iOS", 65000.0),
    ("Samsung", "Android", 30000.0),
    ("OnePlus", "Android", 35000.0),
    ("Xiaomi", "Android", 15000.0),
    ("Realme", "Android", 12000.0),
    ("Vivo", "Android", 18000.0),
    ("Google", "Android", 45000.0),
];
const STORAGE_GB: [u32; 5] = [32, 64, 128, 256, 512];
const RAM_GB: [u32; 5] = [3, 4, 6, 8, 12];

const ROWS: usize = 200;
const MISSING_RATE: f64 = 0.04;
const DUPLICATE_RATE: f64 = 0.05;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "mobile_phone_prices.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Brand", "Price", "Storage_GB", "RAM_GB", "OS"])?;

    let mut previous: Option<[String; 5]> = None;
    let mut written = 0;
    while written < ROWS {
        // Repeat the last row now and then so the cleaner has work to do.
        if let Some(prev) = previous.as_ref().filter(|_| rng.chance(DUPLICATE_RATE)) {
            writer.write_record(prev)?;
            written += 1;
            continue;
        }

        let &(brand, os, base) = rng.pick(&BRANDS);
        let storage = *rng.pick(&STORAGE_GB);
        let ram = *rng.pick(&RAM_GB);
        let price = base * (1.0 + storage as f64 / 512.0) * (0.85 + 0.3 * rng.next_f64());

        let mut blank = |value: String| {
            if rng.chance(MISSING_RATE) {
                String::new()
            } else {
                value
            }
        };
        let row = [
            blank(brand.to_string()),
            blank(format!("{:.0}", price.round())),
            blank(storage.to_string()),
            blank(ram.to_string()),
            blank(os.to_string()),
        ];
        writer.write_record(&row)?;
        previous = Some(row);
        written += 1;
    }
    writer.flush()?;

    println!("Wrote {written} listings to {output_path}");
    Ok(())
}
