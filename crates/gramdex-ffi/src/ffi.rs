//! C-compatible FFI interface for Searcher
//!
//! # Memory Ownership Rules
//!
//! - `gramdex_searcher_build()` copies the sentences; the caller keeps its own
//!   buffers and owns the returned handle
//! - `gramdex_searcher_free()` must be called to deallocate the handle
//! - `error_msg` strings and JSON strings are owned by the caller and released
//!   through the matching free function
//! - `indices` and match arrays are borrowed from the searcher and stay valid
//!   only until the next search on the same handle

use std::os::raw::c_char;
use std::ptr;
use std::time::Instant;

use gramdex_core::{Match, Searcher};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::util::{borrow_str, copy_string_array, cstring_or_fallback, free_cstring, FfiResult};

// Safety limits
const MAX_QUERY_LENGTH: usize = 64 * 1024;
const MAX_CORPUS_SIZE: usize = 10_000_000;

/// Opaque searcher owned by C callers.
///
/// Searches mutate scratch state, so concurrent callers are serialized.
pub struct SearcherHandle {
    inner: Mutex<Searcher>,
}

/// C-compatible result for gramdex_searcher_build
#[repr(C)]
pub struct GramdexBuildResultC {
    pub success: bool,
    pub error_msg: *mut c_char,
    pub searcher: *mut SearcherHandle,
    pub sentence_count: usize,
    pub unique_tokens: usize,
    pub build_time_us: u64,
}

/// C-compatible result for gramdex_searcher_search
#[repr(C)]
pub struct GramdexSearchResultC {
    pub success: bool,
    pub error_msg: *mut c_char,
    /// Borrowed ordering of all sentence indices; the first `num_results` are sorted.
    pub indices: *const usize,
    pub indices_len: usize,
    pub search_time_us: u64,
}

impl FfiResult for GramdexBuildResultC {
    const ERROR_FALLBACK: &'static str = "build failed";

    fn with_error(error_msg: *mut c_char) -> Self {
        Self {
            success: false,
            error_msg,
            searcher: ptr::null_mut(),
            sentence_count: 0,
            unique_tokens: 0,
            build_time_us: 0,
        }
    }
}

impl FfiResult for GramdexSearchResultC {
    const ERROR_FALLBACK: &'static str = "search failed";

    fn with_error(error_msg: *mut c_char) -> Self {
        Self {
            success: false,
            error_msg,
            indices: ptr::null(),
            indices_len: 0,
            search_time_us: 0,
        }
    }
}

fn handle_ref<'a>(handle: *const SearcherHandle) -> Option<&'a SearcherHandle> {
    if handle.is_null() {
        None
    } else {
        Some(unsafe { &*handle })
    }
}

fn query_arg<'a>(query: *const c_char) -> Result<&'a str, String> {
    let query = unsafe { borrow_str(query) }.map_err(|e| format!("query: {}", e))?;
    if query.len() > MAX_QUERY_LENGTH {
        return Err("query exceeds maximum length".to_string());
    }
    Ok(query)
}

// ============================================================================
// Searcher Lifecycle
// ============================================================================

#[no_mangle]
pub extern "C" fn gramdex_init_logger() {
    crate::init_logger();
}

/// Index `len` NUL-terminated sentences.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_build(
    sentences: *const *const c_char,
    len: usize,
) -> GramdexBuildResultC {
    if len > MAX_CORPUS_SIZE {
        warn!(len, "corpus exceeds maximum size");
        return GramdexBuildResultC::error("corpus exceeds maximum size");
    }

    let start = Instant::now();
    let sentences = match unsafe { copy_string_array(sentences, len) } {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "rejected sentence array");
            return GramdexBuildResultC::error(&e);
        }
    };

    let searcher = match Searcher::new(sentences) {
        Ok(s) => s,
        Err(e) => return GramdexBuildResultC::error(&e.to_string()),
    };

    let sentence_count = searcher.len();
    let unique_tokens = searcher.unique_token_count();
    let build_time_us = start.elapsed().as_micros() as u64;
    debug!(sentence_count, unique_tokens, build_time_us, "built searcher");

    let handle = Box::new(SearcherHandle {
        inner: Mutex::new(searcher),
    });

    GramdexBuildResultC {
        success: true,
        error_msg: ptr::null_mut(),
        searcher: Box::into_raw(handle),
        sentence_count,
        unique_tokens,
        build_time_us,
    }
}

/// Release the error message of a build result. The searcher is not freed.
#[no_mangle]
pub extern "C" fn gramdex_build_result_free(result: GramdexBuildResultC) {
    unsafe { free_cstring(result.error_msg) };
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_free(handle: *mut SearcherHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle);
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Index of the sentence most similar to `query`, or -1 on error or an
/// empty corpus.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_find_best_match(
    handle: *const SearcherHandle,
    query: *const c_char,
) -> i64 {
    let Some(handle) = handle_ref(handle) else {
        warn!("find_best_match on null searcher");
        return -1;
    };
    let query = match query_arg(query) {
        Ok(q) => q,
        Err(e) => {
            warn!(error = %e, "rejected query");
            return -1;
        }
    };

    match handle.inner.lock().find_best_match(query) {
        Ok(Some(index)) => index as i64,
        Ok(None) => -1,
        Err(e) => {
            warn!(error = %e, "best match failed");
            -1
        }
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_search(
    handle: *const SearcherHandle,
    query: *const c_char,
    num_results: usize,
    gram_length: usize,
    threshold: f32,
) -> GramdexSearchResultC {
    let Some(handle) = handle_ref(handle) else {
        return GramdexSearchResultC::error("null searcher pointer");
    };
    let query = match query_arg(query) {
        Ok(q) => q,
        Err(e) => return GramdexSearchResultC::error(&e),
    };

    let start = Instant::now();
    let mut searcher = handle.inner.lock();
    let (indices, indices_len) = match searcher.search(query, num_results, gram_length, threshold)
    {
        Ok(ranking) => (ranking.as_ptr(), ranking.len()),
        Err(e) => {
            warn!(error = %e, "search rejected");
            return GramdexSearchResultC::error(&e.to_string());
        }
    };

    GramdexSearchResultC {
        success: true,
        error_msg: ptr::null_mut(),
        indices,
        indices_len,
        search_time_us: start.elapsed().as_micros() as u64,
    }
}

/// Release the error message of a search result. `indices` stays owned by
/// the searcher.
#[no_mangle]
pub extern "C" fn gramdex_search_result_free(result: GramdexSearchResultC) {
    unsafe { free_cstring(result.error_msg) };
}

// ============================================================================
// Per-sentence Results
// ============================================================================

/// Match spans of sentence `index` from the last search. Returns null and
/// writes 0 to `out_len` when the index is out of range.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_get_matches(
    handle: *const SearcherHandle,
    index: usize,
    out_len: *mut usize,
) -> *const Match {
    let found = handle_ref(handle).and_then(|h| {
        h.inner
            .lock()
            .matches(index)
            .ok()
            .map(|m| (m.as_ptr(), m.len()))
    });
    let (matches, len) = found.unwrap_or((ptr::null(), 0));
    if !out_len.is_null() {
        unsafe { *out_len = len };
    }
    matches
}

/// Number of match spans of sentence `index`, or -1 when out of range.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_get_match_count(
    handle: *const SearcherHandle,
    index: usize,
) -> i64 {
    handle_ref(handle)
        .and_then(|h| h.inner.lock().matches(index).ok().map(|m| m.len() as i64))
        .unwrap_or(-1)
}

/// Write the last score of sentence `index` to `out_score`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_get_score(
    handle: *const SearcherHandle,
    index: usize,
    out_score: *mut f32,
) -> bool {
    if out_score.is_null() {
        return false;
    }
    match handle_ref(handle).and_then(|h| h.inner.lock().score(index).ok()) {
        Some(score) => {
            unsafe { *out_score = score };
            true
        }
        None => false,
    }
}

/// Top `limit` hits of the last search as a JSON array.
///
/// Free with `gramdex_string_free`. Returns null on a null handle.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_searcher_hits_json(
    handle: *const SearcherHandle,
    limit: usize,
) -> *mut c_char {
    let Some(handle) = handle_ref(handle) else {
        return ptr::null_mut();
    };
    let hits = handle.inner.lock().hits(limit);
    match serde_json::to_string(&hits) {
        Ok(json) => cstring_or_fallback(&json, "[]"),
        Err(e) => {
            warn!(error = %e, "failed to serialize hits");
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gramdex_string_free(s: *mut c_char) {
    unsafe { free_cstring(s) };
}

#[no_mangle]
pub extern "C" fn gramdex_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
