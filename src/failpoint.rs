//! Named fault-injection points for exercising I/O error paths.
//!
//! Points are enabled per thread, or process-wide through the
//! `BLOCKLOG_FAILPOINTS` environment variable (comma separated names).

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;

/// Fails the write that initialises a freshly allocated log block
pub const LOG_INIT_BLOCK: &str = "log_init_block";

thread_local! {
    static FAILPOINTS: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

pub fn enable(name: &str) {
    FAILPOINTS.with(|set| {
        set.borrow_mut().insert(name.to_string());
    });
}

pub fn disable(name: &str) {
    FAILPOINTS.with(|set| {
        set.borrow_mut().remove(name);
    });
}

pub fn is_enabled(name: &str) -> bool {
    if FAILPOINTS.with(|set| set.borrow().contains(name)) {
        return true;
    }

    std::env::var("BLOCKLOG_FAILPOINTS")
        .ok()
        .is_some_and(|raw| raw.split(',').any(|v| v.trim() == name))
}

pub fn maybe_fail(name: &str) -> io::Result<()> {
    if is_enabled(name) {
        Err(io::Error::other(format!("failpoint triggered: {name}")))
    } else {
        Ok(())
    }
}
