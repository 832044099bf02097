//! Options for a windowed calculation.

use alphav_core::{DataError, Result};
use serde::{Deserialize, Serialize};

/// Tuning for a windowed calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOptions {
    /// Maximum number of offsets to compute. `None` means as many as the
    /// series allows.
    pub element_processing_limit: Option<usize>,
}

impl WindowOptions {
    /// Creates options with no limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            element_processing_limit: None,
        }
    }

    /// Caps the number of offsets computed.
    ///
    /// Zero computes no offsets; negative values are rejected.
    pub fn with_element_processing_limit(mut self, limit: i64) -> Result<Self> {
        let limit = usize::try_from(limit).map_err(|_| {
            DataError::InvalidParameter(format!(
                "element processing limit must not be negative: {limit}"
            ))
        })?;
        self.element_processing_limit = Some(limit);
        Ok(self)
    }

    /// Number of offsets to compute when `usable` offsets are available.
    #[must_use]
    pub fn effective_limit(&self, usable: usize) -> usize {
        self.element_processing_limit.map_or(usable, |l| l.min(usable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_validation() {
        assert!(matches!(
            WindowOptions::new().with_element_processing_limit(-1),
            Err(DataError::InvalidParameter(_))
        ));
        let o = WindowOptions::new().with_element_processing_limit(0).unwrap();
        assert_eq!(o.element_processing_limit, Some(0));
        assert_eq!(o.effective_limit(40), 0);
        let o = WindowOptions::new().with_element_processing_limit(12).unwrap();
        assert_eq!(o.element_processing_limit, Some(12));
    }

    #[test]
    fn test_effective_limit_clamps() {
        let o = WindowOptions::new().with_element_processing_limit(50).unwrap();
        assert_eq!(o.effective_limit(10), 10);
        assert_eq!(o.effective_limit(80), 50);
        assert_eq!(WindowOptions::default().effective_limit(7), 7);
    }
}
