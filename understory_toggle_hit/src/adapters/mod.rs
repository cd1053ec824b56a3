// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the geometry core stays
//! dependency-light.
//!
//! ## Available Adapters
//!
//! - `model` (`model_adapter` feature): turns a pointer press into a toggle on an
//!   `understory_check_tree::Tree`, suppressing default row handling inside the
//!   leading region.

#[cfg(feature = "model_adapter")]
pub mod model;
