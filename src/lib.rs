//! Purpose: Shared core library crate used by the `linkprobe` CLI and tests.
//! Exports: `core` (attribute model, build env, header emission, chain, errors).
//! Role: Internal library backing the harness binary; not yet a stable SDK.
//! Invariants: Treat the crate API as internal until a dedicated release.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod core;
