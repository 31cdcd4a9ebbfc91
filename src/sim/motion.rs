//! Motion integrator
//!
//! Items fall straight down at their own speed. Speeds are expressed per
//! reference frame, so the caller passes a tick scale derived from elapsed
//! time rather than a fixed per-call increment.

use super::state::FallingItem;

/// Advance every live item by `speed * tick_scale * rate`
pub fn integrate(items: &mut [FallingItem], tick_scale: f32, rate: f32) {
    if !(tick_scale > 0.0) || !(rate > 0.0) {
        return;
    }
    let step = tick_scale * rate;
    for item in items.iter_mut() {
        item.y += item.speed * step;
    }
}
