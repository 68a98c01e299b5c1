//! Writes a deterministic raw listings export in the layout of a public
//! Inside Airbnb `listings.csv`, including the dirt the cleaner has to deal
//! with: currency-formatted prices, `N/A` cells, blank fields, free-text
//! bathrooms and `t`/`f` flags.
//!
//! Usage: `generate-sample [OUTPUT] [ROWS]` (defaults: raw_listings.csv, 500).

use std::path::PathBuf;

use anyhow::{Context, Result};

const HEADER: [&str; 22] = [
    "id",
    "name",
    "host_id",
    "host_name",
    "host_is_superhost",
    "host_total_listings_count",
    "neighbourhood_cleansed",
    "neighbourhood_group_cleansed",
    "latitude",
    "longitude",
    "property_type",
    "room_type",
    "accommodates",
    "bathrooms_text",
    "bedrooms",
    "beds",
    "price",
    "minimum_nights",
    "number_of_reviews",
    "reviews_per_month",
    "review_scores_rating",
    "availability_365",
];

/// (group, neighbourhoods, base nightly price, centre lat/lon)
const AREAS: [(&str, &[&str], f64, (f64, f64)); 4] = [
    ("Centre", &["Old Town", "Harbour", "Cathedral Quarter"], 140.0, (41.387, 2.170)),
    ("North", &["Hillside", "University"], 95.0, (41.410, 2.150)),
    ("East", &["Beachfront", "Docklands"], 120.0, (41.395, 2.200)),
    ("West", &["Market District"], 70.0, (41.375, 2.130)),
];

/// (label, price factor, property types)
const ROOM_TYPES: [(&str, f64, &[&str]); 4] = [
    ("Entire home/apt", 1.6, &["Entire rental unit", "Entire condo", "Entire loft"]),
    ("Private room", 0.7, &["Private room in rental unit", "Private room in home"]),
    ("Shared room", 0.4, &["Shared room in hostel"]),
    ("Hotel room", 1.3, &["Room in boutique hotel"]),
];

/// (name, listing count). The counts cover every host type bucket.
const HOSTS: [(&str, u32); 8] = [
    ("Ana", 1),
    ("Bruno", 1),
    ("Carla", 2),
    ("Dmitri", 3),
    ("Eve", 6),
    ("Stay Apartments", 12),
    ("Urban Rentals Ltd", 140),
    ("Global Stays", 420),
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// `$1,234.00`
fn dollars(amount: f64) -> String {
    let cents = format!("{amount:.2}");
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${grouped}.{frac}")
}

fn bathrooms_text(baths: f64, shared: bool) -> String {
    match (baths, shared) {
        (b, _) if b == 0.5 => "Half-bath".to_string(),
        (b, true) if b == 1.0 => "1 shared bath".to_string(),
        (b, false) if b == 1.0 => "1 bath".to_string(),
        (b, true) => format!("{b} shared baths"),
        (b, false) => format!("{b} baths"),
    }
}

/// Blank the cell with probability `p`.
fn maybe_blank(rng: &mut SimpleRng, p: f64, value: String) -> String {
    if rng.chance(p) {
        String::new()
    } else {
        value
    }
}

fn listing_row(rng: &mut SimpleRng, id: u64) -> Vec<String> {
    let (group, hoods, base, (lat, lon)) = *rng.pick(&AREAS);
    let neighbourhood = *rng.pick(hoods);
    let (room_label, factor, properties) = *rng.pick(&ROOM_TYPES);
    let host_index = rng.below(HOSTS.len());
    let (host_name, host_count) = HOSTS[host_index];

    let accommodates = 1 + rng.below(6) as u32;
    let bedrooms = (accommodates / 2).max(1);
    let beds = bedrooms + rng.below(2) as u32;
    let baths = [0.5, 1.0, 1.0, 1.5, 2.0][rng.below(5)];
    let price = (base * factor + 18.0 * accommodates as f64 + rng.gauss(0.0, 20.0)).max(12.0);
    let reviews = rng.below(300) as u32;
    let rating = rng.gauss(92.0, 5.0).clamp(20.0, 100.0);

    // A few rows carry the faults a scraped export really has.
    let price_cell = match rng.below(100) {
        0 => "N/A".to_string(),
        1 => String::new(),
        2 => format!("-{}", dollars(price)),
        3 => dollars(price * 12.0),
        _ => dollars(price),
    };
    let superhost = if rng.chance(0.2) { "t" } else { "f" };
    let room_cell = if rng.chance(0.01) {
        "Campervan".to_string()
    } else {
        room_label.to_string()
    };

    vec![
        id.to_string(),
        maybe_blank(rng, 0.02, format!("{} in {neighbourhood}", properties[0])),
        format!("{}", 1000 + host_index),
        host_name.to_string(),
        maybe_blank(rng, 0.03, superhost.to_string()),
        maybe_blank(rng, 0.02, host_count.to_string()),
        neighbourhood.to_string(),
        maybe_blank(rng, 0.05, group.to_string()),
        format!("{:.5}", lat + rng.gauss(0.0, 0.01)),
        format!("{:.5}", lon + rng.gauss(0.0, 0.01)),
        rng.pick(properties).to_string(),
        room_cell,
        accommodates.to_string(),
        maybe_blank(rng, 0.04, bathrooms_text(baths, room_label == "Shared room")),
        maybe_blank(rng, 0.06, bedrooms.to_string()),
        maybe_blank(rng, 0.04, beds.to_string()),
        price_cell,
        [1, 1, 2, 3, 30][rng.below(5)].to_string(),
        reviews.to_string(),
        if reviews == 0 {
            String::new()
        } else {
            format!("{:.2}", rng.next_f64() * 4.0)
        },
        if reviews == 0 {
            String::new()
        } else {
            format!("{rating:.0}")
        },
        rng.below(366).to_string(),
    ]
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "raw_listings.csv".into()));
    let rows: u64 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 500,
    };

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record(HEADER)?;
    for i in 0..rows {
        writer.write_record(listing_row(&mut rng, 10_000 + i))?;
    }
    writer.flush()?;

    println!("Wrote {rows} raw listings to {}", output_path.display());
    Ok(())
}
