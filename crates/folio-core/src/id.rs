//! Process-unique identifier generation for blocks and pages.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use smol_str::{format_smolstr, SmolStr};

static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_PAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a block id, unique for the lifetime of the process.
pub fn next_block_id() -> SmolStr {
    format_smolstr!("b-{}", NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
}

/// Generate a page id.
///
/// Page ids outlive the process (they key persisted records), so the
/// counter is salted with the creation timestamp.
pub fn next_page_id() -> SmolStr {
    format_smolstr!(
        "page-{}-{}",
        now_ms(),
        NEXT_PAGE_ID.fetch_add(1, Ordering::Relaxed)
    )
}

/// Current time as milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
