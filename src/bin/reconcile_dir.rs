// src/bin/reconcile_dir.rs

use anyhow::{Context, Result};
use glob::glob;
use rayon::prelude::*;
use std::{env, path::PathBuf, time::Instant};
use tabrecon::{reconcile_file, Settings};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const PATTERNS: [&str; 2] = ["*.csv", "*.txt"];

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // usage: reconcile_dir <DIR> <TEMPLATE>
    let mut args = env::args().skip(1);
    let (Some(dir), Some(template)) = (args.next(), args.next()) else {
        anyhow::bail!("Usage: reconcile_dir <DIR> <TEMPLATE>");
    };
    let dir = PathBuf::from(dir);
    let settings = Settings::from_env()?;
    // fail on a bad template before fanning out
    settings.templates.require(&template)?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for pat in PATTERNS {
        let pattern = dir.join(pat);
        let pattern = pattern.to_string_lossy();
        paths.extend(
            glob(&pattern)
                .with_context(|| format!("bad glob pattern {}", pattern))?
                .filter_map(|p| p.ok()),
        );
    }
    paths.sort();
    info!(dir = %dir.display(), files = paths.len(), "found input files");

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()
        .ok();

    let start = Instant::now();
    let lines: Vec<Option<String>> = paths
        .par_iter()
        .map(|path| {
            let json = reconcile_file(path, &template, &settings)
                .and_then(|report| serde_json::to_string(&report).map_err(Into::into));
            match json {
                Ok(line) => Some(line),
                Err(e) => {
                    error!(path = %path.display(), "{:#}", e);
                    None
                }
            }
        })
        .collect();

    // print in path order once every file is done
    let failed = lines.iter().filter(|l| l.is_none()).count();
    for line in lines.into_iter().flatten() {
        println!("{}", line);
    }
    info!(
        files = paths.len(),
        failed,
        elapsed = ?start.elapsed(),
        "done"
    );
    Ok(())
}
