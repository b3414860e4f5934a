//! Host-pipeline boundary.
//!
//! The host build pipeline hands each module reference to a [`ResolverHook`]
//! registered under a named stage, and expects its completion callback to be
//! driven exactly once per request: with a rewritten request on success, or
//! with nothing to decline and let the pipeline's default resolution run.
//!
//! Startup is a separate phase: the cache must be loaded (or rebuilt) and
//! the [`Resolver`] constructed before the first request future is created.
//! Per-request work never fails after that point; misses decline.

use crate::error::Error;
use crate::resolver::Resolver;
use std::path::PathBuf;

/// Conventional stage the hook taps into.
pub const SOURCE_STAGE: &str = "resolve";

/// Conventional stage resolution continues into.
pub const TARGET_STAGE: &str = "resolved";

/// A single resolution request from the host pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Directory of the requesting file.
    pub path: PathBuf,
    /// The requested module specifier.
    pub request: String,
}

/// Outcome of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request was rewritten: `path` now carries the resolved absolute
    /// file path.
    Rewritten(ResolveRequest),
    /// Not handled; the pipeline continues unmodified.
    Declined,
}

/// Resolution step registered in the host pipeline.
#[derive(Debug)]
pub struct ResolverHook {
    source: String,
    target: String,
    resolver: Resolver,
}

impl ResolverHook {
    /// Create a hook tapping `source`, continuing into `target`.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, resolver: Resolver) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            resolver,
        }
    }

    /// Stage this hook taps.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Stage resolution continues into.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Per-request future: resolves to exactly one [`Outcome`].
    pub async fn resolve(&self, request: ResolveRequest) -> Outcome {
        match self.resolver.resolve(&request.path, &request.request) {
            Some(absolute) => Outcome::Rewritten(ResolveRequest {
                path: PathBuf::from(absolute),
                request: request.request,
            }),
            None => Outcome::Declined,
        }
    }

    /// Drive one request and report through the pipeline completion
    /// contract: `(None, Some(rewritten))` on success, `(None, None)` to
    /// decline. The callback is consumed by value, so it fires exactly once.
    pub async fn tap<F>(&self, request: ResolveRequest, complete: F)
    where
        F: FnOnce(Option<Error>, Option<ResolveRequest>),
    {
        match self.resolve(request).await {
            Outcome::Rewritten(rewritten) => complete(None, Some(rewritten)),
            Outcome::Declined => complete(None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheData;
    use crate::config::Config;
    use std::path::{Path, PathBuf};

    fn hook() -> ResolverHook {
        let config = Config::new(PathBuf::from("/app"));
        let data = CacheData {
            load_paths: vec!["/gems/lib".to_owned()],
            entries: vec!["/gems/lib/foo.rb".to_owned()],
        };
        let resolver = Resolver::new(&config, &data);
        ResolverHook::new(SOURCE_STAGE, TARGET_STAGE, resolver)
    }

    #[tokio::test]
    async fn test_resolve_rewrites_path_and_keeps_specifier() {
        let hook = hook();
        let outcome = hook
            .resolve(ResolveRequest {
                path: PathBuf::from("/app/src"),
                request: "./foo.rb".to_owned(),
            })
            .await;

        match outcome {
            Outcome::Rewritten(request) => {
                assert_eq!(request.path, Path::new("/gems/lib/foo.rb"));
                assert_eq!(request.request, "./foo.rb");
            }
            Outcome::Declined => panic!("expected a rewrite"),
        }
    }

    #[tokio::test]
    async fn test_resolve_declines_on_miss() {
        let hook = hook();
        let outcome = hook
            .resolve(ResolveRequest {
                path: PathBuf::from("/app/src"),
                request: "bar.js".to_owned(),
            })
            .await;
        assert_eq!(outcome, Outcome::Declined);
    }

    #[tokio::test]
    async fn test_tap_completes_once_with_rewrite() {
        let hook = hook();
        let mut completion = None;
        hook.tap(
            ResolveRequest {
                path: PathBuf::from("/app/src"),
                request: "./foo.rb".to_owned(),
            },
            |error, rewritten| completion = Some((error.is_none(), rewritten)),
        )
        .await;

        let (no_error, rewritten) = completion.expect("completion must fire");
        assert!(no_error);
        assert_eq!(
            rewritten.unwrap().path,
            Path::new("/gems/lib/foo.rb")
        );
    }

    #[tokio::test]
    async fn test_tap_completes_once_with_decline() {
        let hook = hook();
        let mut completion = None;
        hook.tap(
            ResolveRequest {
                path: PathBuf::from("/app/src"),
                request: "style.css".to_owned(),
            },
            |error, rewritten| completion = Some((error.is_none(), rewritten)),
        )
        .await;

        let (no_error, rewritten) = completion.expect("completion must fire");
        assert!(no_error);
        assert!(rewritten.is_none());
    }

    #[tokio::test]
    async fn test_stage_names() {
        let hook = hook();
        assert_eq!(hook.source(), "resolve");
        assert_eq!(hook.target(), "resolved");
    }
}
