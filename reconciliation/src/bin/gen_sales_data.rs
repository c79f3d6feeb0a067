//! Synthetic sales export generator
//!
//! Produces a day's CSV export, seeding a fixed share of high-value
//! transactions so the approval gate has something to flag.
//!
//! Usage: gen_sales_data [DATE] [STORE_ROOT] [RECORDS]

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use reconciliation::SalesRecord;
use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;

const HIGH_VALUE_THRESHOLD: i64 = 1_000_000;

// (product, min price, max price, category)
const PRODUCTS: &[(&str, i64, i64, &str)] = &[
    ("Professional hair dryer", 30_000, 80_000, "beauty"),
    ("Serum gift set", 15_000, 50_000, "beauty"),
    ("Shampoo assortment", 5_000, 20_000, "haircare"),
    ("Electric toothbrush", 10_000, 40_000, "health"),
    ("Air purifier", 30_000, 80_000, "appliance"),
    ("Hair straightener", 15_000, 45_000, "beauty"),
    ("Facial massager", 20_000, 60_000, "beauty"),
    ("Electric shaver", 10_000, 35_000, "health"),
    ("Humidifier", 8_000, 30_000, "appliance"),
    ("Massage gun", 15_000, 50_000, "health"),
];

// Items priced above the approval threshold
const HIGH_VALUE_PRODUCTS: &[(&str, &str)] = &[
    ("Commercial esthetic machine", "equipment"),
    ("Premium massage chair", "furniture"),
    ("Commercial beauty equipment set", "equipment"),
    ("Salon display fixtures", "furniture"),
];

const REGIONS: &[&str] = &[
    "Tokyo", "Osaka", "Nagoya", "Fukuoka", "Sapporo", "Sendai", "Hiroshima", "Yokohama",
];

fn generate(date: &str, num_records: usize) -> Result<Vec<SalesRecord>, Box<dyn Error>> {
    let mut rng = rand::thread_rng();
    let base = NaiveDate::parse_from_str(date, "%Y-%m-%d")?
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");

    let high_value_count = (num_records / 200).max(1).min(num_records);
    let high_value_indices: HashSet<usize> =
        rand::seq::index::sample(&mut rng, num_records, high_value_count)
            .into_iter()
            .collect();

    let mut records = Vec::with_capacity(num_records);
    for i in 0..num_records {
        let company = format!("Company {}{}", (b'A' + (i % 26) as u8) as char, i / 26 + 1);

        let (product, amount, category) = if high_value_indices.contains(&i) {
            let (name, category) = HIGH_VALUE_PRODUCTS
                .choose(&mut rng)
                .expect("product table is non-empty");
            (*name, rng.gen_range(HIGH_VALUE_THRESHOLD..=5_000_000), *category)
        } else {
            let (name, min, max, category) = PRODUCTS
                .choose(&mut rng)
                .expect("product table is non-empty");
            (*name, rng.gen_range(*min..=*max), *category)
        };

        records.push(SalesRecord {
            id: format!("{:05}", i + 1),
            customer_name: company,
            product: product.to_string(),
            amount,
            quantity: rng.gen_range(1..=10),
            region: REGIONS.choose(&mut rng).expect("region table is non-empty").to_string(),
            category: category.to_string(),
            timestamp: (base + chrono::Duration::seconds(i as i64 * 8))
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
        });
    }

    Ok(records)
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let date = args.next().unwrap_or_else(|| "2025-01-15".to_string());
    let store_root = PathBuf::from(args.next().unwrap_or_else(|| "./data/store".to_string()));
    let num_records: usize = args.next().map(|n| n.parse()).transpose()?.unwrap_or(10_000);

    println!("Generating {num_records} records for {date}...");
    let records = generate(&date, num_records)?;

    let out_dir = store_root.join("sales");
    std::fs::create_dir_all(&out_dir)?;
    let out_file = out_dir.join(format!("{date}.csv"));

    let mut writer = csv::Writer::from_path(&out_file)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let total: i64 = records.iter().map(|r| r.amount).sum();
    let high_value = records
        .iter()
        .filter(|r| r.amount >= HIGH_VALUE_THRESHOLD)
        .count();

    println!("\n=== Summary ===");
    println!("Total records: {}", records.len());
    println!("Total sales: {total}");
    println!("High-value (>= {HIGH_VALUE_THRESHOLD}): {high_value} records");
    println!("File: {}", out_file.display());
    println!("\n=== Next Steps ===");
    println!("RECON_STORE_ROOT={} cargo run --bin daily_run {date}", store_root.display());

    Ok(())
}
