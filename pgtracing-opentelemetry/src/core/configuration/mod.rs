// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the span forwarder
//!
//! # Sources of configuration
//!
//! ```text
//! ^ Highest precedence
//! |
//! * ConfigBuilder setters
//! |
//! * Environment variables
//! |
//! * Default values
//! |
//! v Lowest level of precedence
//! ```

#[allow(clippy::module_inception)]
mod configuration;
mod sources;
mod supported_configurations;

pub use configuration::{Config, ConfigBuilder, RelationName};
