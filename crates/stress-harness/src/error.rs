// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the stress harness.

/// Errors that can occur while loading or running a workload.
#[derive(Debug, thiserror::Error)]
pub enum StressError {
    /// The workload config file could not be read.
    #[error("cannot read workload config '{path}': {detail}")]
    ConfigRead { path: String, detail: String },

    /// The workload config did not parse as TOML.
    #[error("workload config parse error: {0}")]
    ConfigParse(String),

    /// The workload config parsed but describes an unrunnable workload.
    #[error("invalid workload: {0}")]
    InvalidWorkload(String),
}
