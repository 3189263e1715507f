//! Landing geometry
//!
//! Decides which platform the fallen stick reaches and whether its tip lands
//! in the perfect area. Both windows are open intervals: a tip exactly on a
//! platform edge misses, and a tip exactly on the perfect-area border is an
//! ordinary hit.

use serde::{Deserialize, Serialize};

use super::state::{Platform, Stick};
use crate::consts::LANDED_ROTATION;

/// Result of a landing check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Platform under the stick tip, if any
    pub platform: Option<Platform>,
    /// Tip landed inside the perfect area (always false on a miss)
    pub perfect: bool,
}

impl Hit {
    pub fn miss() -> Self {
        Self {
            platform: None,
            perfect: false,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.platform.is_some()
    }

    /// Score awarded for this landing
    pub fn points(&self) -> u64 {
        match (self.platform, self.perfect) {
            (None, _) => 0,
            (Some(_), false) => 1,
            (Some(_), true) => 2,
        }
    }
}

/// Platform whose interior strictly contains `tip`
pub fn platform_under(tip: f32, platforms: &[Platform]) -> Option<Platform> {
    platforms
        .iter()
        .find(|p| p.x < tip && tip < p.right())
        .copied()
}

/// Whether `tip` lies strictly inside the perfect area centred on the platform
pub fn is_perfect(tip: f32, platform: &Platform, perfect_area: f32) -> bool {
    let mid = platform.midpoint();
    let half = perfect_area / 2.0;
    mid - half < tip && tip < mid + half
}

/// Resolve where a fully turned stick lands
///
/// # Panics
///
/// Panics unless the stick is lying exactly at 90°. Checking any other
/// rotation means the phase machine called this at the wrong time.
pub fn resolve_hit(stick: &Stick, platforms: &[Platform], perfect_area: f32) -> Hit {
    assert!(
        stick.rotation == LANDED_ROTATION,
        "landing evaluated with stick at {}°",
        stick.rotation
    );

    let tip = stick.tip();
    match platform_under(tip, platforms) {
        Some(platform) => Hit {
            platform: Some(platform),
            perfect: is_perfect(tip, &platform, perfect_area),
        },
        None => Hit::miss(),
    }
}
