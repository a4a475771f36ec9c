//! Writes a synthetic fire-properties export with the full raw column set,
//! including the duplicated comment header and the blank trailing column a
//! spreadsheet export produces.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mfr_risk::data::schema::MEASUREMENTS;

#[derive(Parser, Debug)]
#[command(name = "generate-sample", about = "Write a synthetic fire-properties CSV")]
struct Args {
    #[arg(long, default_value = mfr_risk::config::DEFAULT_DATASET)]
    out: PathBuf,
    #[arg(long, default_value_t = 240)]
    rows: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Material text and how readily it ignites (0 slow .. 1 fast).
const MATERIALS: [(&str, f64); 10] = [
    ("PMMA", 0.85),
    ("Rigid PVC sheet", 0.45),
    ("Nylon 6", 0.7),
    ("Polycarbonate", 0.5),
    ("Carbon fiber laminate", 0.35),
    ("Fiberglass panel", 0.3),
    ("Plywood 12mm", 0.6),
    ("Red oak", 0.55),
    ("Gypsum board", 0.1),
    ("Mineral wool", 0.05),
];

const HEAT_FLUXES: [f64; 4] = [25.0, 35.0, 50.0, 75.0];
const LABS: [&str; 3] = ["NIST", "FM Global", "UL"];
const OPERATORS: [&str; 4] = ["JD", "AB", "CD", "KM"];
const ORIENTATIONS: [&str; 2] = ["HORIZONTAL", "VERTICAL"];

fn headers() -> Vec<&'static str> {
    let mut headers = vec!["Source_File", "LABORATORY", "TEST IDENT", "OPERATOR", "MATERIAL", "ORIENTATION"];
    headers.extend(MEASUREMENTS);
    headers.extend(["PRE TEST CMT", "POST TEST CMT", "POST TEST CMT", ""]);
    headers
}

fn sample_row(rng: &mut StdRng, idx: usize) -> Vec<String> {
    let (material, ignitability) = MATERIALS[rng.gen_range(0..MATERIALS.len())];
    let heat_flux = HEAT_FLUXES[rng.gen_range(0..HEAT_FLUXES.len())];
    let surf_area = if rng.gen_bool(0.5) { 0.0088 } else { 0.01 };
    let mass: f64 = rng.gen_range(5.0..120.0);
    let time_to_ign = (4000.0 * (1.1 - ignitability) / heat_flux + rng.gen_range(-5.0..5.0f64)).max(2.0);
    let scan_count: u32 = rng.gen_range(200..900);

    let measurements: [f64; 15] = [
        heat_flux,
        surf_area,
        rng.gen_range(0.038..0.044),
        rng.gen_range(0.0..5.0),
        mass,
        rng.gen_range(1.0..5.0f64).round(),
        rng.gen_range(10.0..16.0),
        rng.gen_range(8.0..12.0),
        rng.gen_range(8.0..12.0),
        rng.gen_range(1.0..1.4),
        f64::from(scan_count),
        time_to_ign.round(),
        f64::from(scan_count),
        rng.gen_range(300.0..1800.0f64).round(),
        if rng.gen_bool(0.95) { 0.0 } else { 1.0 },
    ];

    let mut row = vec![
        format!("cone_{:03}.csv", idx / 20),
        LABS[rng.gen_range(0..LABS.len())].to_string(),
        format!("T{idx:05}"),
        OPERATORS[rng.gen_range(0..OPERATORS.len())].to_string(),
        material.to_string(),
        if rng.gen_bool(0.9) {
            ORIENTATIONS[rng.gen_range(0..ORIENTATIONS.len())].to_string()
        } else {
            String::new()
        },
    ];
    // roughly one measurement in twenty is left blank
    row.extend(measurements.iter().map(|v| {
        if rng.gen_bool(0.05) {
            String::new()
        } else {
            format!("{v:.4}")
        }
    }));
    row.extend([
        "conditioned 48h".to_string(),
        if time_to_ign < 20.0 { "flashover".to_string() } else { String::new() },
        String::new(),
        String::new(),
    ]);
    row
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    writer.write_record(headers())?;
    for idx in 0..args.rows {
        writer.write_record(sample_row(&mut rng, idx))?;
    }
    writer.flush()?;

    println!("Wrote {} samples to {}", args.rows, args.out.display());
    Ok(())
}
