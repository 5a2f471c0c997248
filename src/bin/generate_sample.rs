use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use trade_atlas::data::model::Route;
use trade_atlas::data::sample::sample_routes;
use trade_atlas::geo::CountryLocator;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn pick<'a>(&mut self, items: &'a [String]) -> &'a str {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// `count` random routes between countries the map can place.
fn synthetic_routes(count: usize, rng: &mut SimpleRng) -> Vec<Route> {
    let countries: Vec<String> = CountryLocator::builtin()
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();

    (0..count)
        .map(|_| {
            let origin = rng.pick(&countries).to_string();
            let destination = rng.pick(&countries).to_string();
            let volume = (5.0 + rng.next_f64() * 195.0).round();
            let tariff = (rng.next_f64() * 40.0).round() / 100.0;
            Route::new(origin, destination, volume, tariff)
        })
        .collect()
}

fn write_json(routes: &[Route], path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(routes).context("serialising routes")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn write_csv(routes: &[Route], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for route in routes {
        writer.serialize(route).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(routes: &[Route], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("origin", DataType::Utf8, false),
        Field::new("destination", DataType::Utf8, false),
        Field::new("volume", DataType::Float64, false),
        Field::new("tariff_impact", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(routes.iter().map(|r| r.origin.as_str()))),
            Arc::new(StringArray::from_iter_values(
                routes.iter().map(|r| r.destination.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(routes.iter().map(|r| r.volume))),
            Arc::new(Float64Array::from_iter_values(routes.iter().map(|r| r.tariff_impact))),
        ],
    )
    .context("building record batch")?;

    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Usage: `generate_sample [OUT_DIR] [--synthetic N]`
///
/// Writes `routes.json`, `routes.csv` and `routes.parquet` into `OUT_DIR`
/// (default `sample_data`). Without `--synthetic` the built-in sample table
/// is written; with it, `N` seeded random routes.
fn main() -> Result<()> {
    env_logger::init();

    let mut out_dir = PathBuf::from("sample_data");
    let mut synthetic: Option<usize> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--synthetic" => {
                let n = args.next().context("--synthetic needs a route count")?;
                synthetic = Some(n.parse().with_context(|| format!("bad route count '{n}'"))?);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            dir => out_dir = PathBuf::from(dir),
        }
    }

    let routes = match synthetic {
        Some(n) => synthetic_routes(n, &mut SimpleRng::new(42)),
        None => sample_routes(),
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    write_json(&routes, &out_dir.join("routes.json"))?;
    write_csv(&routes, &out_dir.join("routes.csv"))?;
    write_parquet(&routes, &out_dir.join("routes.parquet"))?;

    log::info!("Wrote {} routes to {}", routes.len(), out_dir.display());
    println!("Wrote {} routes to {}", routes.len(), out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trade_atlas::data::loader::load_file;

    #[test]
    fn test_synthetic_routes_are_well_formed_and_seeded() {
        let a = synthetic_routes(50, &mut SimpleRng::new(7));
        let b = synthetic_routes(50, &mut SimpleRng::new(7));
        assert_eq!(a, b);
        for (i, r) in a.iter().enumerate() {
            assert!(r.validate(i).is_ok(), "{r}");
        }
    }

    #[test]
    fn test_written_files_load_back() {
        let dir = std::env::temp_dir().join(format!("trade_atlas_gen_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let routes = sample_routes();

        let writers: [(&str, fn(&[Route], &Path) -> Result<()>); 3] = [
            ("routes.json", write_json),
            ("routes.csv", write_csv),
            ("routes.parquet", write_parquet),
        ];
        for (name, write) in writers {
            let path = dir.join(name);
            write(&routes, &path).unwrap();
            let outcome = load_file(&path).unwrap();
            assert_eq!(outcome.dataset.routes, routes, "{name}");
            assert!(outcome.skipped.is_empty());
        }
        std::fs::remove_dir_all(&dir).ok();
    }
}
