// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Core components of the forwarder: configuration, logging and errors

pub mod configuration;
pub mod constants;

mod error;
pub use error::{Error, Result, ResultExt};

pub mod log;
