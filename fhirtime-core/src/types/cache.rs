use serde::{Deserialize, Serialize};

/// Per-request instruction controlling whether caches may answer it.
///
/// Directives are plain values: two directives built from the same inputs
/// compare equal and produce the same header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheDirective {
    /// Send `no-store`: intermediaries must not serve or keep a stored copy
    pub no_store: bool,
    /// Send `no-cache`: intermediaries must revalidate with the origin
    pub no_cache: bool,
}

impl CacheDirective {
    /// Directive that leaves default caching behaviour alone
    pub const fn allow() -> Self {
        Self {
            no_store: false,
            no_cache: false,
        }
    }

    pub fn is_store_disabled(&self) -> bool {
        self.no_store
    }

    /// Whether any caching layer is asked to step aside
    pub fn bypasses_cache(&self) -> bool {
        self.no_store || self.no_cache
    }

    /// `Cache-Control` request header value, if any directive is set
    pub fn header_value(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if self.no_cache {
            parts.push("no-cache");
        }
        if self.no_store {
            parts.push("no-store");
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl std::fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.header_value() {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "default"),
        }
    }
}
