//! Measurement snapshot handed to consumers.

use super::window::FLOOR_DB;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Momentary level above which a signal counts as present.
pub const ACTIVITY_THRESHOLD_DB: f64 = -60.0;

/// One throttled loudness reading.
///
/// Every level is floored at [`FLOOR_DB`]; `lra` is never negative.
/// `lra` is `|momentary - short_term|` and `true_peak` is the sample peak
/// over the momentary window, so both are approximations of the
/// broadcast-standard quantities with the same names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// 400 ms RMS level (LUFS-like).
    pub momentary: f64,
    /// 3 s RMS level (LUFS-like).
    pub short_term: f64,
    /// Gated average since the last reset (LUFS-like).
    pub integrated: f64,
    /// Approximate loudness range (LU).
    pub lra: f64,
    /// Approximate true peak (dBTP-like).
    pub true_peak: f64,
}

impl Measurement {
    pub const SILENT: Self = Self {
        momentary: FLOOR_DB,
        short_term: FLOOR_DB,
        integrated: FLOOR_DB,
        lra: 0.0,
        true_peak: FLOOR_DB,
    };

    /// Whether the momentary level indicates audible signal.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.momentary > ACTIVITY_THRESHOLD_DB
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::SILENT
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} LUFS | S {} LUFS | I {} LUFS | LRA {:.1} LU | TP {} dBTP",
            Db(self.momentary),
            Db(self.short_term),
            Db(self.integrated),
            self.lra,
            Db(self.true_peak),
        )
    }
}

/// Display adaptor for a floored level: `-oo` at the floor, one decimal otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Db(pub f64);

impl fmt::Display for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= FLOOR_DB {
            f.write_str("-oo")
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}
