use std::cell::RefCell;
use std::fs::File;
use std::rc::Rc;
use std::time::Duration;

use assert_matches::assert_matches;
use tempfile::TempDir;

use fillup::audio::{MockBackend, SoundCuePlayer};
use fillup::binding::{LabelBinding, Point};
use fillup::button::{HoldButton, HoldPhase};
use fillup::clock::{Clock, ManualClock};
use fillup::config::HoldStyle;
use fillup::haptics::MockHaptics;

// Headless harness driving a HoldButton on a manual clock, with recording
// audio/haptic sinks. Default style: 1.2s fill, 31 pulses.
struct Harness {
    button: HoldButton,
    clock: ManualClock,
    haptics: MockHaptics,
    audio: MockBackend,
    label: LabelBinding,
    completions: Rc<RefCell<Vec<Point>>>,
    _sound_dir: TempDir,
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn harness() -> Harness {
    let sound_dir = tempfile::tempdir().unwrap();
    File::create(sound_dir.path().join("buildup.wav")).unwrap();
    File::create(sound_dir.path().join("release.wav")).unwrap();

    let audio = MockBackend::new();
    let haptics = MockHaptics::new();
    let label = LabelBinding::new("Press and hold button");
    let completions: Rc<RefCell<Vec<Point>>> = Rc::new(RefCell::new(Vec::new()));
    let recorded = completions.clone();

    let sounds = SoundCuePlayer::new(sound_dir.path(), Box::new(audio.clone()))
        .with_clips("buildup", "release");
    let button = HoldButton::new(HoldStyle::default(), sounds, Box::new(haptics.clone()))
        .with_label(label.clone())
        .with_on_complete(move |center, text| {
            recorded.borrow_mut().push(center);
            *text = "Button complete!".to_string();
        });

    Harness {
        button,
        clock: ManualClock::new(),
        haptics,
        audio,
        label,
        completions,
        _sound_dir: sound_dir,
    }
}

impl Harness {
    /// Tick in 10ms steps until the clock reaches `target_ms`.
    fn step_to(&mut self, target_ms: u64) {
        while self.clock.now() < ms(target_ms) {
            self.clock.advance(ms(10));
            self.button.tick(self.clock.now());
        }
    }

    fn completion_count(&self) -> usize {
        self.completions.borrow().len()
    }
}

#[test]
fn scenario_a_early_release_never_notifies() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(500);
    assert!(h.button.fill_fraction() > 0.3);

    h.button.press_end(h.clock.now());
    assert_matches!(h.button.phase(), HoldPhase::Settling);

    // Wait well past twice the fill duration: the completion task must never
    // fire after cancellation.
    h.step_to(2400);
    assert_eq!(h.completion_count(), 0);
    assert!(!h.button.is_completed());
    assert_matches!(h.button.phase(), HoldPhase::Idle);
    assert_eq!(h.button.fill_fraction(), 0.0);

    // Buildup was played and then cut; the release cue never sounded.
    let played = h.audio.played();
    assert_eq!(played.len(), 1);
    assert!(played[0].ends_with("buildup.wav"));
    assert!(h.audio.stop_count() >= 1);
}

#[test]
fn scenario_b_full_hold_notifies_once_with_center() {
    let mut h = harness();
    h.button.set_center(Point::new(40.0, 12.0));
    h.button.press_begin(h.clock.now());
    h.step_to(1300);

    assert!(h.button.is_completed());
    assert_matches!(h.button.phase(), HoldPhase::Completed);
    assert_eq!(h.button.fill_fraction(), 1.0);
    assert_eq!(h.completions.borrow().as_slice(), &[Point::new(40.0, 12.0)]);
    assert_eq!(h.label.get(), "Button complete!");
    assert_eq!(h.haptics.success_count(), 1);

    let played = h.audio.played();
    assert_eq!(played.len(), 2);
    assert!(played[1].ends_with("release.wav"));
}

#[test]
fn scenario_c_restart_attributes_completion_to_second_session() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(100);
    h.button.press_end(h.clock.now());
    h.step_to(150);
    h.button.press_begin(h.clock.now());

    // First session would have completed at 1.2s; the second completes at
    // 150ms + 1.2s.
    h.step_to(1300);
    assert!(!h.button.is_completed());
    assert_eq!(h.completion_count(), 0);

    h.step_to(1400);
    assert!(h.button.is_completed());
    assert_eq!(h.completion_count(), 1);
    assert_eq!(h.haptics.success_count(), 1);
}

#[test]
fn cancellation_voids_all_pending_pulses() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(500);
    h.button.press_end(h.clock.now());
    let fired = h.haptics.impact_count();
    assert!(fired > 0 && fired < 31);

    // No leaked pulse may fire after the session was canceled.
    h.step_to(2400);
    assert_eq!(h.haptics.impact_count(), fired);
}

#[test]
fn new_press_voids_the_previous_sessions_tasks() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(100);
    h.button.press_end(h.clock.now());
    let after_cancel = h.haptics.impact_count();

    // Quiet window between the canceled session and the next press.
    h.step_to(140);
    assert_eq!(h.haptics.impact_count(), after_cancel);

    h.button.press_begin(h.clock.now());
    h.step_to(1500);

    // The second session delivers its full pulse schedule on top of whatever
    // the first session got out before cancellation.
    assert_eq!(h.haptics.impact_count(), after_cancel + 31);
    assert_eq!(h.completion_count(), 1);
}

#[test]
fn full_session_delivers_the_configured_pulse_ramp() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(1300);

    let impacts = h.haptics.impacts();
    assert_eq!(impacts.len(), 31);
    assert_eq!(impacts[0], 0.0);
    // Linear ramp, never decreasing...
    for pair in impacts.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    // ...clamped at full intensity for the final third.
    for &intensity in &impacts[20..] {
        assert_eq!(intensity, 1.0);
    }
}

#[test]
fn fill_is_monotonic_while_filling() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    let mut prev = h.button.fill_fraction();
    while h.clock.now() < ms(1100) {
        h.clock.advance(ms(10));
        h.button.tick(h.clock.now());
        let fill = h.button.fill_fraction();
        assert!(fill >= prev, "fill regressed from {prev} to {fill}");
        prev = fill;
    }
    assert!(prev > 0.85);
}

#[test]
fn release_after_completion_is_idempotent() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(1300);
    assert_eq!(h.completion_count(), 1);

    h.button.press_end(h.clock.now());
    h.step_to(2600);
    assert!(h.button.is_completed());
    assert_matches!(h.button.phase(), HoldPhase::Completed);
    assert_eq!(h.completion_count(), 1);
    assert_eq!(h.button.fill_fraction(), 1.0);
}

#[test]
fn completed_button_ignores_presses_until_reset() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(1300);
    assert!(h.button.is_completed());

    h.button.press_begin(h.clock.now());
    assert!(!h.button.is_pressed());
    h.step_to(2600);
    assert_eq!(h.completion_count(), 1);

    h.button.reset();
    assert_matches!(h.button.phase(), HoldPhase::Idle);
    assert_eq!(h.button.fill_fraction(), 0.0);
    // The label is left to whatever the callback wrote.
    assert_eq!(h.label.get(), "Button complete!");

    h.button.press_begin(h.clock.now());
    h.step_to(3900);
    assert_eq!(h.completion_count(), 2);
}

#[test]
fn cancel_settles_all_render_values_back_to_rest() {
    let mut h = harness();
    h.button.press_begin(h.clock.now());
    h.step_to(600);
    assert!((h.button.scale() - 1.0).abs() > 1e-3);
    h.button.press_end(h.clock.now());
    h.step_to(1200);

    assert_eq!(h.button.fill_fraction(), 0.0);
    assert_eq!(h.button.scale(), 1.0);
    assert_eq!(h.button.shake_offset(), 0.0);
}
