//! Drive one resolution request through the pipeline hook.

use miette::{miette, IntoDiagnostic, Result};
use owlr_core::hook::{Outcome, ResolveRequest, ResolverHook, SOURCE_STAGE, TARGET_STAGE};
use owlr_core::{Config, Resolver};
use std::path::Path;

pub fn run(config: &Config, specifier: &str, from: Option<&Path>, json: bool) -> Result<()> {
    // Startup phase: load or rebuild the cache, then build the resolver
    let data = super::cache::load(config)?;
    let resolver = Resolver::new(config, &data);
    let hook = ResolverHook::new(SOURCE_STAGE, TARGET_STAGE, resolver);

    let request = ResolveRequest {
        path: from.unwrap_or(&config.root).to_path_buf(),
        request: specifier.to_owned(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .into_diagnostic()?;
    match runtime.block_on(hook.resolve(request)) {
        Outcome::Rewritten(rewritten) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "resolved": rewritten.path })
                );
            } else {
                println!("{}", rewritten.path.display());
            }
            Ok(())
        }
        Outcome::Declined => Err(miette!("declined: no load path provides {specifier}")),
    }
}
