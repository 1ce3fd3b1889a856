//! Batch log normalization service.
//!
//! A request carries a JSON array of loosely shaped log records (or a single
//! record). Each batch is decoded, validated, normalized and summarized by
//! [`pipeline`]; [`web`] exposes that over HTTP.

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod web;
