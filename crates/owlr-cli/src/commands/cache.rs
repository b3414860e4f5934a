//! Cache inspection commands: `paths`, `entries`, `rebuild`.

use miette::{IntoDiagnostic, Result};
use owlr_core::{BundlerEnumerator, CacheData, CacheStore, Config};
use std::fs;
use tracing::warn;

/// Load the cache, rebuilding if stale, and surface any advisories.
pub(crate) fn load(config: &Config) -> Result<CacheData> {
    let mut store = CacheStore::new(config.clone());
    let source = BundlerEnumerator::new(config);
    let data = store.ensure_loaded(&source).into_diagnostic()?.clone();
    for warning in store.warnings() {
        warn!("{warning}");
    }
    Ok(data)
}

pub fn paths(config: &Config, json: bool) -> Result<()> {
    let data = load(config)?;
    if json {
        println!(
            "{}",
            serde_json::to_string(&data.load_paths).into_diagnostic()?
        );
    } else {
        for path in &data.load_paths {
            println!("{path}");
        }
    }
    Ok(())
}

pub fn entries(config: &Config, json: bool) -> Result<()> {
    let data = load(config)?;
    if json {
        println!("{}", serde_json::to_string(&data.entries).into_diagnostic()?);
    } else {
        for entry in &data.entries {
            println!("{entry}");
        }
    }
    Ok(())
}

pub fn rebuild(config: &Config, json: bool) -> Result<()> {
    let cache_file = config.cache_file();
    if cache_file.exists() {
        fs::remove_file(&cache_file).into_diagnostic()?;
    }

    let data = load(config)?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "load_paths": data.load_paths.len(),
                "entries": data.entries.len(),
            })
        );
    } else {
        println!(
            "rebuilt cache: {} load paths, {} entries",
            data.load_paths.len(),
            data.entries.len()
        );
    }
    Ok(())
}
