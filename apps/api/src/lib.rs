//! CV screening: lexical field extraction from résumés, deterministic weighted
//! scoring against a job requirement profile, and batch ranking.
//!
//! `analysis` is the embeddable core. `routes`, `state`, `config` and `errors`
//! wrap it in the HTTP service started by `main.rs`.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod routes;
pub mod state;
