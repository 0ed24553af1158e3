//! Core utilities: control-step time management

pub mod time;
