//! Course generation
//!
//! Lays out every bar of a level up front, nearest first. Gap centres are
//! random but each one stays within the avatar's reachable drift from the
//! previous gap, widened by a fixed slack. Two tuning rules shape the
//! sequence:
//!
//! - **Forced extremes**: on a fixed index pattern the gap snaps to one end of
//!   the allowed range, giving sharp difficulty spikes.
//! - **Anti-stagnation**: elsewhere a band around the previous centre is cut
//!   out of the range so consecutive gaps tend to move.
//!
//! The slack makes this a fairness heuristic rather than a solvability proof.

use rand::Rng;

use super::state::{Bar, Viewport};
use crate::consts::{MIN_DRIFT_FACTOR, MIN_SPACING_RADII, REACH_SLACK};
use crate::levels::LevelConfig;

/// Tunable placement rules
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRules {
    /// Multiplier on the reachable drift between consecutive gaps
    pub reach_slack: f32,
    /// Fraction of the reachable drift counted as standing still
    pub min_drift_factor: f32,
    pub forced_extremes: bool,
    pub anti_stagnation: bool,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            reach_slack: REACH_SLACK,
            min_drift_factor: MIN_DRIFT_FACTOR,
            forced_extremes: true,
            anti_stagnation: true,
        }
    }
}

impl PlacementRules {
    /// Bars 2, 5, 7, 10, 12, ... alternate two- and three-bar intervals
    pub fn is_forced_extreme(&self, index: usize) -> bool {
        self.forced_extremes && index > 0 && matches!(index % 5, 0 | 2)
    }
}

/// How many bars fit and how far apart they sit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseLayout {
    pub count: usize,
    pub spacing: f32,
}

/// Compute the layout, or `None` if the level degenerates to an empty course
pub fn course_layout(
    config: &LevelConfig,
    viewport: Viewport,
    avatar_radius: f32,
) -> Option<CourseLayout> {
    if !config.is_playable() || !viewport.is_valid() {
        return None;
    }

    let course = viewport.course_length();
    let min_spacing = MIN_SPACING_RADII * avatar_radius;
    let max_fit = if min_spacing > 0.0 {
        ((course / min_spacing).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let count = (config.bar_count as usize).min(max_fit);
    Some(CourseLayout {
        count,
        spacing: course / count as f32,
    })
}

/// Generate a course with the default placement rules
pub fn generate_bars<R: Rng + ?Sized>(
    config: &LevelConfig,
    viewport: Viewport,
    avatar_radius: f32,
    avatar_speed: f32,
    rng: &mut R,
) -> Vec<Bar> {
    generate_bars_with(
        config,
        viewport,
        avatar_radius,
        avatar_speed,
        &PlacementRules::default(),
        rng,
    )
}

/// Generate a course, nearest bar first
pub fn generate_bars_with<R: Rng + ?Sized>(
    config: &LevelConfig,
    viewport: Viewport,
    avatar_radius: f32,
    avatar_speed: f32,
    rules: &PlacementRules,
    rng: &mut R,
) -> Vec<Bar> {
    let Some(layout) = course_layout(config, viewport, avatar_radius) else {
        log::warn!(
            "Level '{}' produces no bars (bars={}, gap={}, speed={}, viewport={}x{})",
            config.name,
            config.bar_count,
            config.gap_fraction,
            config.bar_speed,
            viewport.width,
            viewport.height
        );
        return Vec::new();
    };

    let width = viewport.width;
    let gap_width = config.gap_fraction * width;
    let half_gap = gap_width / 2.0;
    // Centres that keep the whole gap on screen
    let (valid_lo, valid_hi) = (half_gap, width - half_gap);
    let thickness = viewport.bar_thickness();
    let avatar_speed = avatar_speed.max(0.0);

    let mut bars: Vec<Bar> = Vec::with_capacity(layout.count);
    let mut prev_center = 0.0;

    for index in 0..layout.count {
        let position = -thickness - index as f32 * layout.spacing;

        let center = match bars.last() {
            None => sample(rng, valid_lo, valid_hi),
            Some(prev) => {
                let time_available = (prev.position - position) / config.bar_speed;
                let max_travel = avatar_speed * time_available;
                let reach = max_travel * rules.reach_slack;
                let min_drift = max_travel * rules.min_drift_factor;

                let lo = (prev_center - reach).max(valid_lo);
                let hi = (prev_center + reach).min(valid_hi);
                place_center(rng, rules, index, prev_center, lo, hi, min_drift)
            }
        }
        .clamp(valid_lo, valid_hi);

        let gap_start = (center - half_gap).clamp(0.0, width - gap_width);
        log::debug!("bar {}: pos={:.1} gap={:.1}..{:.1}", index, position, gap_start, gap_start + gap_width);

        bars.push(Bar {
            id: index as u32,
            position,
            gap_start,
            gap_width,
            thickness,
        });
        prev_center = center;
    }

    log::info!(
        "Generated {} of {} requested bars for '{}' (spacing {:.1})",
        bars.len(),
        config.bar_count,
        config.name,
        layout.spacing
    );
    bars
}

/// Pick the next gap centre inside `[lo, hi]`
fn place_center<R: Rng + ?Sized>(
    rng: &mut R,
    rules: &PlacementRules,
    index: usize,
    prev_center: f32,
    lo: f32,
    hi: f32,
    min_drift: f32,
) -> f32 {
    if rules.is_forced_extreme(index) && hi - lo > 2.0 * min_drift {
        return if rng.random_bool(0.5) { lo } else { hi };
    }

    let (lo, hi) = if rules.anti_stagnation {
        exclude_drift_band(prev_center, lo, hi, min_drift, rng.random_bool(0.5))
    } else {
        (lo, hi)
    };
    sample(rng, lo, hi)
}

/// Cut the band within `min_drift` of the previous centre out of one side
///
/// `raise_lower` pushes the lower bound up past the band (gap moves right),
/// otherwise the upper bound comes down (gap moves left). Falls back to the
/// original range when the cut leaves nothing.
pub fn exclude_drift_band(
    prev_center: f32,
    lo: f32,
    hi: f32,
    min_drift: f32,
    raise_lower: bool,
) -> (f32, f32) {
    let (new_lo, new_hi) = if raise_lower {
        ((prev_center + min_drift).max(lo), hi)
    } else {
        (lo, (prev_center - min_drift).min(hi))
    };

    if new_lo < new_hi { (new_lo, new_hi) } else { (lo, hi) }
}

#[inline]
fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.random_range(lo..=hi) } else { lo }
}
