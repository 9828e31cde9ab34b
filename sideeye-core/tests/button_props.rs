//! Property tests for button gesture classification

use proptest::prelude::*;
use sideeye_core::input::{ButtonClassifier, Gesture, HOLD_MS, LONG_HOLD_MS};

const STEP_MS: u32 = 10;

/// Drive `segments` of (pressed, duration) at a fixed sample period
fn run(segments: &[(bool, u32)]) -> Vec<Gesture> {
    let mut button = ButtonClassifier::new();
    let mut events = Vec::new();
    let mut t = 0u32;
    for &(pressed, duration) in segments {
        let end = t + duration;
        while t < end {
            if let Some(gesture) = button.update(pressed, t) {
                events.push(gesture);
            }
            t += STEP_MS;
        }
    }
    events
}

fn count(events: &[Gesture], gesture: Gesture) -> usize {
    events.iter().filter(|g| **g == gesture).count()
}

proptest! {
    #[test]
    fn no_edge_no_events(deltas in prop::collection::vec(1u32..5000, 1..200)) {
        let mut button = ButtonClassifier::new();
        let mut t = 0u32;
        for delta in deltas {
            t = t.wrapping_add(delta);
            prop_assert_eq!(button.update(false, t), None);
        }
        prop_assert!(!button.is_pressed());
        prop_assert_eq!(button.press_duration(), 0);
    }

    #[test]
    fn short_press_is_one_click(press in 7u32..60, idle in 40u32..200) {
        let events = run(&[(true, press * STEP_MS), (false, idle * STEP_MS)]);
        prop_assert_eq!(events, vec![Gesture::Click]);
    }

    #[test]
    fn quick_second_press_is_double_click(
        first in 7u32..20,
        gap in 7u32..25,
        second in 7u32..20,
    ) {
        let events = run(&[
            (true, first * STEP_MS),
            (false, gap * STEP_MS),
            (true, second * STEP_MS),
            (false, 1000),
        ]);
        prop_assert_eq!(events, vec![Gesture::DoubleClick]);
    }

    #[test]
    fn hold_without_long_hold(held in (HOLD_MS / STEP_MS + 10)..(LONG_HOLD_MS / STEP_MS - 10)) {
        let events = run(&[(true, held * STEP_MS), (false, 1000)]);
        prop_assert_eq!(events, vec![Gesture::Hold]);
    }
}

#[test]
fn long_press_reports_hold_then_long_hold() {
    let events = run(&[(true, LONG_HOLD_MS + 500), (false, 1000)]);
    assert_eq!(events, vec![Gesture::Hold, Gesture::LongHold]);
    assert_eq!(count(&events, Gesture::Click), 0);
}
