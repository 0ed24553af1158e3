//! Python FFI layer
//!
//! Thin PyO3 wrappers over the Rust core, compiled only with the `pyo3`
//! feature. The CBA path is exposed as a single class; the RTC loop stays
//! Rust-side because it needs a live hydraulic engine implementation.

pub mod central_basin;
