//! Purpose: Consuming linkage fixture (`libtarget`), the library under test.
//! Exports: `target()`, `TARGET_SENTINEL`, `checked_target`, `check_dependency`.
//! Role: Calls into `bar` at runtime so a harness can verify the whole link
//! chain from a single return value.
//! Invariants: `target()` returns `TARGET_SENTINEL` iff `bar()` returned its
//! sentinel; any other dependency value aborts the process before returning.
//! Invariants: The typed `checked_target` path never aborts.
use std::error::Error as StdError;
use std::fmt;

use bar::{BAR_SENTINEL, bar};
use libc::c_int;

/// Value every successful call to [`target`] returns.
pub const TARGET_SENTINEL: c_int = 789;

/// The dependency returned something other than its documented sentinel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DependencyMismatch {
    pub expected: c_int,
    pub actual: c_int,
}

impl fmt::Display for DependencyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bar() returned {} instead of {}",
            self.actual, self.expected
        )
    }
}

impl StdError for DependencyMismatch {}

/// Typed form of the sentinel check for use outside a crash-loud harness.
pub fn check_dependency(value: c_int) -> Result<(), DependencyMismatch> {
    if value == BAR_SENTINEL {
        Ok(())
    } else {
        Err(DependencyMismatch {
            expected: BAR_SENTINEL,
            actual: value,
        })
    }
}

/// Run the chain without abort semantics.
pub fn checked_target() -> Result<c_int, DependencyMismatch> {
    check_dependency(bar())?;
    Ok(TARGET_SENTINEL)
}

fn propagate(value: c_int) -> c_int {
    // Crash loudly on bad wiring; a soft error code could be mistaken for a
    // legitimate return value by the outer harness.
    assert_eq!(value, BAR_SENTINEL, "bar() returned {value}");
    TARGET_SENTINEL
}

#[unsafe(no_mangle)]
pub extern "C" fn target() -> c_int {
    propagate(bar())
}
