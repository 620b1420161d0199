use std::fmt;

use crate::github::constants::{SIZE_KILO, UNITS};

/// A byte count scaled to a binary unit, e.g. `2.00 MiB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanSize {
    pub magnitude: String,
    pub unit: &'static str,
}

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// Format a byte count using 1024 base and units B through YiB.
///
/// Counts past the YiB range stay in YiB rather than scaling further. Ties at
/// the second decimal round away from zero.
pub fn format_size(bytes: u128) -> HumanSize {
    if bytes == 0 {
        return HumanSize {
            magnitude: "0".to_string(),
            unit: UNITS[0],
        };
    }

    let order = (bytes.ilog(SIZE_KILO) as usize).min(UNITS.len() - 1);
    let magnitude = bytes as f64 / (SIZE_KILO as f64).powi(order as i32);
    // `{:.2}` alone would send ties to even
    let magnitude = (magnitude * 100.0).round() / 100.0;
    HumanSize {
        magnitude: format!("{magnitude:.2}"),
        unit: UNITS[order],
    }
}

/// The API reports disk usage in kilobytes.
pub fn kilobytes_to_bytes(kilobytes: u64) -> u128 {
    u128::from(kilobytes) * SIZE_KILO
}
