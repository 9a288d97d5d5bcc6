//! Test Module
//!
//! Cross-module test suite for the Sentify core.
//!
//! ## Test Categories
//! - `analysis_tests`: aggregator, formality breakdown and alignment on realistic emails
//! - `actor_tests`: mock completion actor and the HTTP actor handle under load and failure
//! - `coach_tests`: feedback, generation, context append and edit flows
//! - `integration_tests`: coach wired to the HTTP actor against a mock server

pub mod integration_tests;
