// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tier ladder and point thresholds.
//!
//! A member's tier is always derived from their point total, except for
//! `challenger`, which is an admin-granted override independent of points.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Named rank shown next to a member's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TierType {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Challenger,
}

/// Point range of a tier. `max` is informational only (progress bars).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThreshold {
    pub tier: TierType,
    pub min: u64,
    pub max: Option<u64>,
}

/// Point-based tiers, lowest first. Challenger is flag-driven and not listed.
pub const TIER_THRESHOLDS: [TierThreshold; 6] = [
    TierThreshold { tier: TierType::Bronze, min: 0, max: Some(99) },
    TierThreshold { tier: TierType::Silver, min: 100, max: Some(299) },
    TierThreshold { tier: TierType::Gold, min: 300, max: Some(699) },
    TierThreshold { tier: TierType::Platinum, min: 700, max: Some(1499) },
    TierThreshold { tier: TierType::Diamond, min: 1500, max: Some(2999) },
    TierThreshold { tier: TierType::Master, min: 3000, max: None },
];

/// Display metadata for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierInfo {
    pub name: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
}

impl TierType {
    /// All tiers in ladder order, challenger last.
    pub const ALL: [TierType; 7] = [
        TierType::Bronze,
        TierType::Silver,
        TierType::Gold,
        TierType::Platinum,
        TierType::Diamond,
        TierType::Master,
        TierType::Challenger,
    ];

    /// Minimum points for this tier. Challenger has no threshold and reports 0.
    pub fn min_points(self) -> u64 {
        TIER_THRESHOLDS
            .iter()
            .find(|t| t.tier == self)
            .map_or(0, |t| t.min)
    }

    /// Informational upper bound, `None` when unbounded.
    pub fn max_points(self) -> Option<u64> {
        TIER_THRESHOLDS
            .iter()
            .find(|t| t.tier == self)
            .and_then(|t| t.max)
    }

    /// The tier a member progresses into next, if any.
    ///
    /// Master and challenger are ceilings.
    pub fn next(self) -> Option<TierType> {
        match self {
            TierType::Bronze => Some(TierType::Silver),
            TierType::Silver => Some(TierType::Gold),
            TierType::Gold => Some(TierType::Platinum),
            TierType::Platinum => Some(TierType::Diamond),
            TierType::Diamond => Some(TierType::Master),
            TierType::Master | TierType::Challenger => None,
        }
    }

    pub fn info(self) -> TierInfo {
        match self {
            TierType::Bronze => TierInfo { name: "Bronze", emoji: "🥉", color: "#CD7F32" },
            TierType::Silver => TierInfo { name: "Silver", emoji: "🥈", color: "#C0C0C0" },
            TierType::Gold => TierInfo { name: "Gold", emoji: "🥇", color: "#FFD700" },
            TierType::Platinum => TierInfo { name: "Platinum", emoji: "💠", color: "#00CED1" },
            TierType::Diamond => TierInfo { name: "Diamond", emoji: "💎", color: "#B9F2FF" },
            TierType::Master => TierInfo { name: "Master", emoji: "🔮", color: "#9D4DFF" },
            TierType::Challenger => TierInfo { name: "Challenger", emoji: "👑", color: "#F4C874" },
        }
    }
}

/// Derive a tier from a point total and the challenger override.
///
/// Total for every input: bronze has a minimum of zero, so the scan always
/// finds a match.
pub fn resolve_tier(points: u64, is_challenger: bool) -> TierType {
    if is_challenger {
        return TierType::Challenger;
    }

    TIER_THRESHOLDS
        .iter()
        .rev()
        .find(|t| points >= t.min)
        .map_or(TierType::Bronze, |t| t.tier)
}

/// Points still needed to reach the next tier, `None` at master/challenger.
pub fn points_to_next_tier(points: u64, tier: TierType) -> Option<u64> {
    tier.next()
        .map(|next| next.min_points().saturating_sub(points))
}

/// Progress through the current tier as a fraction in `[0, 1]`.
///
/// Ceiling tiers report a full bar.
pub fn progress_fraction(points: u64, tier: TierType) -> f64 {
    let Some(next) = tier.next() else {
        return 1.0;
    };

    let current_min = tier.min_points();
    let span = next.min_points().saturating_sub(current_min);
    if span == 0 {
        return 1.0;
    }

    let gained = points.saturating_sub(current_min);
    (gained as f64 / span as f64).clamp(0.0, 1.0)
}
