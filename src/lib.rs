// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Vitrine — resilient product-listing scraper.
//!
//! Loads a single listing page in a headless browser, dismisses any
//! consent overlay in its way, and extracts structured product records
//! from repeating item containers with per-field failure isolation.

pub mod browser;
pub mod config;
pub mod consent;
pub mod error;
pub mod export;
pub mod extract;
pub mod markup;
pub mod pipeline;
