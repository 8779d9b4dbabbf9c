//! gramdex C ABI
//!
//! Exposes [`gramdex_core::Searcher`] to C and anything that can call C
//! (WASM hosts, Go via CGO, Python via ctypes).
//!
//! ## Usage from C
//!
//! ```c
//! GramdexBuildResultC built = gramdex_searcher_build(sentences, n);
//! if (!built.success) { ...; gramdex_build_result_free(built); }
//! SearcherHandle *searcher = built.searcher;
//! gramdex_build_result_free(built);
//!
//! GramdexSearchResultC res = gramdex_searcher_search(searcher, "quick brown", 10, 2, 0.5f);
//! for (size_t i = 0; i < 10 && i < res.indices_len; i++) {
//!     size_t n_matches = 0;
//!     const Match *m = gramdex_searcher_get_matches(searcher, res.indices[i], &n_matches);
//! }
//! gramdex_search_result_free(res);
//! gramdex_searcher_free(searcher);
//! ```

pub mod ffi;
mod util;

/// Initialize logging for the library.
///
/// The level is controlled through RUST_LOG (e.g. `RUST_LOG=gramdex_core=debug`),
/// defaulting to `info`. Safe to call more than once.
pub fn init_logger() {
    use std::sync::Once;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
            .is_ok();
        if installed {
            tracing::info!("gramdex library initialized");
        }
    });
}

// Re-export FFI types for C consumers
pub use ffi::{GramdexBuildResultC, GramdexSearchResultC, SearcherHandle};
pub use gramdex_core::Match;
