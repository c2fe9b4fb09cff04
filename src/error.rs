// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised while turning stored or user-supplied values into domain types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinanceError {
    #[error("Unknown {kind} '{value}'")]
    UnknownLabel { kind: &'static str, value: String },
    #[error("Invalid installments {current}/{total}: expected 1 <= current <= total")]
    InvalidInstallments { current: u32, total: u32 },
    #[error("Invalid day of month {0}: expected 1..=31")]
    InvalidDay(u32),
    #[error("Invalid card digits '{0}': expected exactly 4 digits")]
    InvalidCardDigits(String),
    #[error("Invalid date range: {from} is after {to}")]
    InvertedRange { from: String, to: String },
    #[error("Bill {0} not found")]
    BillNotFound(i64),
}
