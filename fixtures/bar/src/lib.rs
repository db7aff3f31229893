//! Purpose: Leaf linkage fixture exporting one C-ABI symbol (`libbar`).
//! Exports: `bar()` and `BAR_SENTINEL`.
//! Role: Verifiable link target; callers assert the sentinel to prove the
//! call crossed the library boundary.
//! Invariants: Stateless; every call returns `BAR_SENTINEL`.
use libc::c_int;

/// Value every call to [`bar`] returns.
pub const BAR_SENTINEL: c_int = 456;

#[unsafe(no_mangle)]
pub extern "C" fn bar() -> c_int {
    BAR_SENTINEL
}
