use fhirtime_core::{BenchError, BenchResult, CacheConfig, CacheDirective};

/// Turns a "disable cache" flag into the directive a request carries.
///
/// Which directives are sent when caching is disabled is policy: `no-store`
/// alone by default, optionally together with `no-cache`. A policy always
/// carries at least one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheControlPolicy {
    no_store: bool,
    no_cache: bool,
}

impl Default for CacheControlPolicy {
    fn default() -> Self {
        Self {
            no_store: true,
            no_cache: false,
        }
    }
}

impl CacheControlPolicy {
    /// Fails when neither directive is enabled, since a disabled-cache
    /// request would then go out exactly like a cached one.
    pub fn new(no_store: bool, no_cache: bool) -> BenchResult<Self> {
        if !no_store && !no_cache {
            return Err(BenchError::Configuration(
                "cache policy must send no-store, no-cache or both".to_string(),
            ));
        }
        Ok(Self { no_store, no_cache })
    }

    pub fn from_config(config: &CacheConfig) -> BenchResult<Self> {
        Self::new(config.no_store, config.no_cache)
    }

    /// Directive for one request; pure and stateless
    pub fn build(&self, disable: bool) -> CacheDirective {
        if !disable {
            return CacheDirective::allow();
        }
        CacheDirective {
            no_store: self.no_store,
            no_cache: self.no_cache,
        }
    }
}
