//! Collision detection between the avatar and bars
//!
//! A bar is solid across the whole track except its gap, and occupies
//! `[position, position + thickness]` on the scroll axis. The gap edges are
//! hard walls: the avatar only slips through when its entire circle fits.

use super::state::{Avatar, Bar};

/// Whether the bar's band overlaps the avatar's extent on the scroll axis
#[inline]
pub fn overlaps_lane(avatar: &Avatar, bar: &Bar) -> bool {
    let top = avatar.lane_position - avatar.radius;
    let bottom = avatar.lane_position + avatar.radius;
    bar.position <= bottom && bar.position + bar.thickness >= top
}

/// Check if the avatar hits the solid part of a bar
pub fn collides(avatar: &Avatar, bar: &Bar) -> bool {
    overlaps_lane(avatar, bar) && (avatar.left() < bar.gap_start || avatar.right() > bar.gap_end())
}

/// First bar (nearest first) the avatar is hitting, if any
pub fn first_collision<'a>(avatar: &Avatar, bars: &'a [Bar]) -> Option<&'a Bar> {
    bars.iter().find(|bar| collides(avatar, bar))
}
