use std::time::Duration;

use crate::anim::Channel;
use crate::audio::{SoundCue, SoundCuePlayer};
use crate::binding::{LabelBinding, Point};
use crate::config::HoldStyle;
use crate::haptics::HapticSink;
use crate::scheduler::TaskSet;

/// Callback fired exactly once per successful hold, with the button's
/// on-screen center and mutable access to its label text.
pub type CompletionFn = Box<dyn FnMut(Point, &mut String)>;

/// Lifecycle of a hold session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPhase {
    Idle,
    /// Pressed; fill ramping toward 1.
    Filling,
    /// Released early; springing back toward rest values.
    Settling,
    /// Hold satisfied. Terminal until `reset`.
    Completed,
}

/// The press-and-hold state machine. Coordinates the fill, scale and shake
/// channels, the scheduled haptic pulses, the sound cues and the single
/// completion event; all pending work is voided atomically when the press is
/// released early.
///
/// Single-threaded by design: everything runs on the caller's control thread,
/// driven by `tick(now)`. Cancellation is cooperative; every scheduled
/// callback re-checks the session flags at fire time, so a task that was
/// already taken out of the queue when the session ended is a no-op rather
/// than a stale effect.
pub struct HoldButton {
    style: HoldStyle,
    phase: HoldPhase,
    is_pressed: bool,
    is_completed: bool,
    fill: Channel,
    scale: Channel,
    shake: Channel,
    shake_sign: f32,
    center: Point,
    label: LabelBinding,
    on_complete: Option<CompletionFn>,
    sounds: SoundCuePlayer,
    haptics: Box<dyn HapticSink>,
    tasks: TaskSet<HoldButton>,
    last_tick: Option<Duration>,
}

impl HoldButton {
    pub fn new(style: HoldStyle, sounds: SoundCuePlayer, haptics: Box<dyn HapticSink>) -> Self {
        Self {
            style: style.sanitized(),
            phase: HoldPhase::Idle,
            is_pressed: false,
            is_completed: false,
            fill: Channel::resting(0.0),
            scale: Channel::resting(1.0),
            shake: Channel::resting(0.0),
            shake_sign: 1.0,
            center: Point::default(),
            label: LabelBinding::default(),
            on_complete: None,
            sounds,
            haptics,
            tasks: TaskSet::new(),
            last_tick: None,
        }
    }

    pub fn with_label(mut self, label: LabelBinding) -> Self {
        self.label = label;
        self
    }

    pub fn with_on_complete(mut self, f: impl FnMut(Point, &mut String) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Current on-screen center, written by layout and passed through to the
    /// completion callback untouched.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn label(&self) -> LabelBinding {
        self.label.clone()
    }

    pub fn style(&self) -> &HoldStyle {
        &self.style
    }

    // Render contract.

    pub fn fill_fraction(&self) -> f32 {
        self.fill.value().clamp(0.0, 1.0)
    }

    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    pub fn shake_offset(&self) -> f32 {
        self.shake.value()
    }

    pub fn phase(&self) -> HoldPhase {
        self.phase
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Press-begin transition. A press while already pressed, or after
    /// completion, is silently ignored.
    pub fn press_begin(&mut self, now: Duration) {
        if self.is_pressed || self.is_completed {
            return;
        }
        // Void any stray tasks from a previous session before starting.
        self.tasks.cancel_all();
        self.sounds.stop();

        self.is_pressed = true;
        self.phase = HoldPhase::Filling;

        self.sounds.play(SoundCue::Buildup);

        // Fill ramps linearly across the whole hold.
        self.fill.snap(0.0);
        self.fill.linear_to(1.0, self.style.fill_secs);

        // Scale dips first, then ramps up for the rest of the fill.
        self.scale
            .sine_out_to(self.style.press_dip_scale, self.style.press_dip_secs);
        let held_scale = self.style.held_scale;
        let ramp_secs = (self.style.fill_secs - self.style.press_dip_secs).max(0.0);
        self.tasks.schedule_at(
            now + Duration::from_secs_f32(self.style.press_dip_secs),
            move |b: &mut HoldButton| {
                if b.is_pressed && !b.is_completed {
                    b.scale.linear_to(held_scale, ramp_secs);
                }
            },
        );

        // Shake starts toward +amplitude and flips direction on an interval.
        self.shake_sign = 1.0;
        self.shake
            .linear_to(self.style.shake_amplitude, self.style.shake_interval_secs());
        self.tasks.schedule_repeating_at(
            now + self.style.shake_interval(),
            self.style.shake_interval(),
            |b: &mut HoldButton| {
                if !b.is_pressed || b.is_completed {
                    return;
                }
                b.shake_sign = -b.shake_sign;
                let target = b.style.shake_amplitude * b.shake_sign;
                b.shake.linear_to(target, b.style.shake_interval_secs());
            },
        );

        // Evenly spaced haptic pulses ramping up in intensity.
        for i in 0..self.style.pulse_count {
            let intensity = self.style.pulse_intensity(i);
            self.tasks.schedule_at(
                now + self.style.pulse_offset(i),
                move |b: &mut HoldButton| {
                    if b.is_pressed && !b.is_completed {
                        b.haptics.impact(intensity.clamp(0.0, 1.0));
                    }
                },
            );
        }

        // Exactly one completion task, guarded at fire time.
        let complete_at = now + self.style.fill_duration();
        self.tasks.schedule_at(complete_at, move |b: &mut HoldButton| {
            if b.is_pressed {
                b.finish(complete_at);
            }
        });
    }

    /// Press-end transition: cancel everything still pending and spring the
    /// visuals back to rest. A release after completion (or without a press)
    /// is a no-op.
    pub fn press_end(&mut self, _now: Duration) {
        if self.is_completed || !self.is_pressed {
            return;
        }
        self.is_pressed = false;
        self.phase = HoldPhase::Settling;

        self.tasks.cancel_all();
        self.sounds.stop();

        let settle = self.style.settle_secs;
        self.fill.back_out_to(0.0, settle);
        self.scale.back_out_to(1.0, settle);
        self.shake.back_out_to(0.0, settle);
    }

    /// Return a completed button to a pressable state. The label is left to
    /// whatever the completion callback wrote; the surrounding screen decides
    /// when (and whether) to call this.
    pub fn reset(&mut self) {
        self.tasks.cancel_all();
        self.sounds.stop();
        self.is_pressed = false;
        self.is_completed = false;
        self.phase = HoldPhase::Idle;
        self.fill.snap(0.0);
        self.scale.snap(1.0);
        self.shake.snap(0.0);
    }

    /// Advance the session to `now`: run due scheduled work, then move the
    /// animation channels. Scheduled work runs first so a completion due this
    /// tick lands before the channels advance past it.
    pub fn tick(&mut self, now: Duration) {
        let dt = match self.last_tick {
            Some(prev) if now > prev => (now - prev).as_secs_f32(),
            _ => 0.0,
        };
        self.last_tick = Some(now);

        for mut task in self.tasks.take_due(now) {
            if !task.is_live() {
                continue;
            }
            task.invoke(self);
            if let Some(every) = task.interval() {
                if task.is_live() {
                    self.tasks.put_back(task, now + every);
                }
            }
        }

        if dt > 0.0 {
            self.fill.advance(dt);
            self.scale.advance(dt);
            self.shake.advance(dt);
        }

        if self.phase == HoldPhase::Settling
            && self.fill.is_settled()
            && self.scale.is_settled()
            && self.shake.is_settled()
        {
            self.phase = HoldPhase::Idle;
        }
    }

    // The completion transition. Fires only from the scheduled completion
    // task, which checked `is_pressed` at fire time.
    fn finish(&mut self, now: Duration) {
        self.is_completed = true;
        self.is_pressed = false;
        self.phase = HoldPhase::Completed;

        self.sounds.play(SoundCue::Release);

        self.fill.snap(1.0);
        self.shake.snap(0.0);
        self.scale
            .elastic_out_to(self.style.max_scale, self.style.settle_secs);

        self.haptics.success();

        // Take the callback out so it can borrow the label while we hold
        // &mut self.
        if let Some(mut callback) = self.on_complete.take() {
            let center = self.center;
            self.label.with_mut(|text| callback(center, text));
            self.on_complete = Some(callback);
        }

        // Ease the overshoot back after a short hold.
        let settle = self.style.settle_secs;
        self.tasks.schedule_at(
            now + self.style.completion_hold(),
            move |b: &mut HoldButton| {
                if b.is_completed {
                    b.scale.back_out_to(1.0, settle);
                }
            },
        );
    }
}
