// Core modules implementing the visibility model, build-configuration
// surface, header emission, chain verification, and error modeling.
pub mod attr;
pub mod buildenv;
pub mod chain;
pub mod error;
pub mod header;
