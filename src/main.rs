use anyhow::{bail, Result};
use std::{env, path::PathBuf};
use tabrecon::{
    process::load_table,
    reconcile_file,
    report::format_for_report,
    Settings,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: tabrecon [--text] <FILE> <TEMPLATE> [CONFIG]";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) parse args ───────────────────────────────────────────────
    let (flags, args): (Vec<String>, Vec<String>) =
        env::args().skip(1).partition(|a| a.starts_with("--"));
    let text_mode = flags.iter().any(|f| f == "--text");
    if let Some(unknown) = flags.iter().find(|f| *f != "--text") {
        bail!("unknown flag {}\n{}", unknown, USAGE);
    }
    let (file, template, config) = match args.as_slice() {
        [file, template] => (PathBuf::from(file), template.as_str(), None),
        [file, template, config] => (PathBuf::from(file), template.as_str(), Some(config)),
        _ => bail!(USAGE),
    };

    // ─── 3) load settings ────────────────────────────────────────────
    let settings = match config {
        Some(path) => Settings::load(path)?,
        None => Settings::from_env()?,
    };
    info!(
        file = %file.display(),
        template,
        templates = settings.templates.len(),
        "startup"
    );

    // ─── 4) reconcile & print ────────────────────────────────────────
    if text_mode {
        settings.templates.require(template)?;
        let (table, _) = load_table(&file, &settings.ingest)?;
        println!("{}", format_for_report(&table.records(), &settings.aliases));
    } else {
        let report = reconcile_file(&file, template, &settings)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
