//! HTTP transport for the sales query core.
//!
//! The query pipeline itself lives in `salesdash-core`; this crate wires it
//! to an axum router and a startup sequence that loads the dataset once.

pub mod web;
