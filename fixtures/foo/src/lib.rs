//! Purpose: Standalone linkage fixture exporting one C-ABI symbol (`libfoo`).
//! Exports: `foo()` and `FOO_SENTINEL`.
//! Role: Exercises the same export pattern as `bar` without participating in
//! the `target` dependency chain.
//! Invariants: Stateless; every call returns `FOO_SENTINEL`.
use libc::c_int;

/// Value every call to [`foo`] returns.
pub const FOO_SENTINEL: c_int = 123;

#[unsafe(no_mangle)]
pub extern "C" fn foo() -> c_int {
    FOO_SENTINEL
}
