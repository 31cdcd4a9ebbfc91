//! Capture classification
//!
//! Items that reach the capture line are removed from the live list and
//! sorted into caught or missed. Removal happens in the same pass as the
//! decision, so an item can never be looked at twice.

use super::state::{Catcher, FallingItem, ItemId};

/// What the line decided for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Falling,
    Caught,
    Missed,
}

/// Items resolved by one pass, in id order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureReport {
    pub caught: Vec<ItemId>,
    pub missed: Vec<ItemId>,
}

impl CaptureReport {
    pub fn resolved(&self) -> usize {
        self.caught.len() + self.missed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved() == 0
    }
}

/// Decide a single item against the catcher
#[inline]
pub fn classify_item(item: &FallingItem, catcher: &Catcher, capture_line: f32) -> Outcome {
    if !item.has_reached(capture_line) {
        Outcome::Falling
    } else if catcher.covers(item.x) {
        Outcome::Caught
    } else {
        Outcome::Missed
    }
}

/// Remove every item at or past the capture line and report how each resolved
pub fn classify(items: &mut Vec<FallingItem>, catcher: &Catcher, capture_line: f32) -> CaptureReport {
    let mut report = CaptureReport::default();
    items.retain(|item| match classify_item(item, catcher, capture_line) {
        Outcome::Falling => true,
        Outcome::Caught => {
            report.caught.push(item.id);
            false
        }
        Outcome::Missed => {
            report.missed.push(item.id);
            false
        }
    });
    report
}

/// Remove every item at or past `near_start` as caught, regardless of the
/// catcher. Returns the swept ids in id order.
pub fn sweep_near(items: &mut Vec<FallingItem>, near_start: f32) -> Vec<ItemId> {
    let mut swept = Vec::new();
    items.retain(|item| {
        if item.has_reached(near_start) {
            swept.push(item.id);
            false
        } else {
            true
        }
    });
    swept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Category;

    fn item_at(id: u32, x: f32, y: f32) -> FallingItem {
        FallingItem {
            id: ItemId(id),
            category: Category::Paper,
            x,
            y,
            speed: 0.3,
        }
    }

    #[test]
    fn test_partitions_falling_caught_missed() {
        let catcher = Catcher::new(50.0, 8.0);
        let mut items = vec![
            item_at(1, 50.0, 40.0),
            item_at(2, 52.0, 86.0),
            item_at(3, 10.0, 87.5),
            item_at(4, 80.0, 85.9),
        ];
        let report = classify(&mut items, &catcher, 86.0);
        assert_eq!(report.caught, vec![ItemId(2)]);
        assert_eq!(report.missed, vec![ItemId(3)]);
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![ItemId(1), ItemId(4)]);
    }

    #[test]
    fn test_exact_half_width_is_a_miss() {
        let catcher = Catcher::new(50.0, 8.0);
        assert_eq!(classify_item(&item_at(1, 58.0, 90.0), &catcher, 86.0), Outcome::Missed);
        assert_eq!(classify_item(&item_at(2, 57.5, 90.0), &catcher, 86.0), Outcome::Caught);
    }

    #[test]
    fn test_second_pass_finds_nothing() {
        let catcher = Catcher::new(50.0, 8.0);
        let mut items = vec![item_at(1, 50.0, 90.0), item_at(2, 0.0, 90.0)];
        let first = classify(&mut items, &catcher, 86.0);
        assert_eq!(first.resolved(), 2);
        let second = classify(&mut items, &catcher, 86.0);
        assert!(second.is_empty());
        assert!(items.is_empty());
    }

    #[test]
    fn test_sweep_near_takes_only_band() {
        let mut items = vec![
            item_at(1, 10.0, 85.0),
            item_at(2, 90.0, 80.0),
            item_at(3, 50.0, 79.9),
            item_at(4, 50.0, 12.0),
        ];
        let swept = sweep_near(&mut items, 80.0);
        assert_eq!(swept, vec![ItemId(1), ItemId(2)]);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.y < 80.0));
    }
}
