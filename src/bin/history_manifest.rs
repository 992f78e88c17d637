use stabbystats::data::{analyze_history, default_manifest_path, DEFAULT_GAMES_CSV};
use stabbystats::logging::ts_now;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let path = PathBuf::from(
        env::args()
            .nth(1)
            .or_else(|| env::var("GAMES_CSV").ok())
            .unwrap_or_else(|| DEFAULT_GAMES_CSV.to_string()),
    );

    let manifest = match analyze_history(&path, &ts_now()) {
        Ok(m) => m,
        Err(err) if err.is_data_format() => {
            eprintln!("format check failed: {}", err);
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("analysis failed: {}", err);
            std::process::exit(3);
        }
    };

    let out_path = default_manifest_path(&path);
    let payload = match serde_json::to_string_pretty(&manifest) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("failed to encode manifest: {}", err);
            std::process::exit(4);
        }
    };
    if let Err(err) = fs::write(&out_path, payload) {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!(
        "wrote manifest {} ({} rows, {} warnings)",
        out_path.display(),
        manifest.row_count,
        manifest.warnings.len()
    );
}
