use anyhow::{Context, Result};
use std::fs;

use stabbystats::config::Config;
use stabbystats::data::cache::HistoryCache;
use stabbystats::logging::{log, obj, v_str, Domain, Level};
use stabbystats::report::build_report;

fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("games_csv", v_str(&cfg.games_csv.display().to_string())),
            ("time_range", v_str(&cfg.time_range)),
            ("match_mode", v_str(cfg.match_mode.as_str())),
            ("today", v_str(&cfg.today.to_string())),
        ]),
    );

    let mut cache = HistoryCache::new();
    let history = cache
        .get_or_load(&cfg.games_csv)
        .with_context(|| format!("loading {}", cfg.games_csv.display()))?;
    let sha = cache.fingerprint(&cfg.games_csv).map(str::to_string);

    let report = match build_report(&history, &cfg.report_options(sha)) {
        Ok(r) => r,
        Err(err) => {
            log(
                Level::Error,
                Domain::Report,
                "render_failed",
                obj(&[("msg", v_str(&err.to_string()))]),
            );
            return Err(err).context("building dashboard report");
        }
    };

    let payload = report.to_json();
    match &cfg.report_path {
        Some(path) => {
            fs::write(path, payload).with_context(|| format!("writing {}", path.display()))?;
            log(
                Level::Info,
                Domain::Report,
                "report_written",
                obj(&[("path", v_str(&path.display().to_string()))]),
            );
        }
        None => println!("{}", payload),
    }
    Ok(())
}
