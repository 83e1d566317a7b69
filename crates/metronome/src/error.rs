// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// An error raised while validating clock configuration.
///
/// The clock itself never fails at runtime. Errors only come from the checked
/// configuration path: [`FixedStep::try_new`][crate::FixedStep::try_new] and
/// [`ClockOptions::validate`][crate::ClockOptions::validate].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The desired update rate was zero, negative, NaN or infinite.
    #[error("desired update rate must be a positive finite number of updates per second, got {0}")]
    InvalidUpdateRate(f64),

    /// The slow-motion factor was negative, NaN or infinite.
    #[error("slow-motion factor must be a finite non-negative number, got {0}")]
    InvalidSlowMotion(f64),
}

/// A specialized `Result` for clock configuration.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);
    }

    #[test]
    fn display_includes_offending_value() {
        assert_eq!(
            Error::InvalidUpdateRate(-1.0).to_string(),
            "desired update rate must be a positive finite number of updates per second, got -1"
        );
        assert_eq!(
            Error::InvalidSlowMotion(f64::NAN).to_string(),
            "slow-motion factor must be a finite non-negative number, got NaN"
        );
    }
}
