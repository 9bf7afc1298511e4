//! Core library for the `massrun` CLI.
//!
//! A run validates raw parameters into a [`domain::RunConfig`], drives a
//! fixed pool of workers against an HTTP API for a bounded time (steering a
//! configurable share of requests to an invalid path), and reduces the
//! shared run state to a [`metrics::RunSummary`]. The request capability is
//! a trait, so runs can be driven against a mock as easily as a live API.
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod metrics;
pub mod runner;
