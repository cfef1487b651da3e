use tween::{BackOut, ElasticOut, Linear, SineOut, Tweener};

// The easings a hold session actually uses. Wrapping whole tweeners lets one
// channel switch easing between transitions (linear fill ramp, sine-out press
// dip, back-out spring return, elastic-out completion overshoot).
enum Drive {
    Linear(Tweener<f32, f32, Linear>),
    SineOut(Tweener<f32, f32, SineOut>),
    BackOut(Tweener<f32, f32, BackOut>),
    ElasticOut(Tweener<f32, f32, ElasticOut>),
}

impl Drive {
    fn move_by(&mut self, dt: f32) -> f32 {
        match self {
            Drive::Linear(t) => t.move_by(dt),
            Drive::SineOut(t) => t.move_by(dt),
            Drive::BackOut(t) => t.move_by(dt),
            Drive::ElasticOut(t) => t.move_by(dt),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Drive::Linear(t) => t.is_finished(),
            Drive::SineOut(t) => t.is_finished(),
            Drive::BackOut(t) => t.is_finished(),
            Drive::ElasticOut(t) => t.is_finished(),
        }
    }
}

/// One animated scalar (fill fraction, scale, shake offset).
pub struct Channel {
    value: f32,
    target: f32,
    drive: Option<Drive>,
}

impl Channel {
    pub fn resting(value: f32) -> Self {
        Self {
            value,
            target: value,
            drive: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the current transition ends (the value itself if at rest).
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.drive.is_none()
    }

    /// Drop any running transition and jump to `to`.
    pub fn snap(&mut self, to: f32) {
        self.value = to;
        self.target = to;
        self.drive = None;
    }

    pub fn linear_to(&mut self, to: f32, secs: f32) {
        self.start(to, secs, |from, to, secs| {
            Drive::Linear(Tweener::linear(from, to, secs))
        });
    }

    pub fn sine_out_to(&mut self, to: f32, secs: f32) {
        self.start(to, secs, |from, to, secs| {
            Drive::SineOut(Tweener::sine_out(from, to, secs))
        });
    }

    /// Spring-style return with a slight overshoot past the target.
    pub fn back_out_to(&mut self, to: f32, secs: f32) {
        self.start(to, secs, |from, to, secs| {
            Drive::BackOut(Tweener::back_out(from, to, secs))
        });
    }

    /// Damped-spring overshoot used for the completion pop.
    pub fn elastic_out_to(&mut self, to: f32, secs: f32) {
        self.start(to, secs, |from, to, secs| {
            Drive::ElasticOut(Tweener::elastic_out(from, to, secs))
        });
    }

    fn start(&mut self, to: f32, secs: f32, make: impl FnOnce(f32, f32, f32) -> Drive) {
        if secs <= 0.0 || self.value == to {
            self.snap(to);
            return;
        }
        self.target = to;
        self.drive = Some(make(self.value, to, secs));
    }

    /// Advance the transition by `dt` seconds and return the current value.
    /// A finished transition lands exactly on its target.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if let Some(drive) = self.drive.as_mut() {
            self.value = drive.move_by(dt);
            if drive.is_finished() {
                self.value = self.target;
                self.drive = None;
            }
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_channel_holds_its_value() {
        let mut channel = Channel::resting(1.0);
        assert_eq!(channel.advance(0.5), 1.0);
        assert!(channel.is_settled());
    }

    #[test]
    fn linear_ramp_is_proportional() {
        let mut channel = Channel::resting(0.0);
        channel.linear_to(1.0, 1.0);
        let mid = channel.advance(0.5);
        assert!((mid - 0.5).abs() < 1e-4, "midpoint was {mid}");
    }

    #[test]
    fn linear_ramp_is_monotonic() {
        let mut channel = Channel::resting(0.0);
        channel.linear_to(1.0, 1.2);
        let mut prev = 0.0;
        for _ in 0..120 {
            let v = channel.advance(0.01);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn transition_ends_exactly_on_target() {
        let mut channel = Channel::resting(0.37);
        channel.back_out_to(0.0, 0.3);
        for _ in 0..100 {
            channel.advance(0.01);
        }
        assert_eq!(channel.value(), 0.0);
        assert!(channel.is_settled());
    }

    #[test]
    fn snap_drops_running_transition() {
        let mut channel = Channel::resting(0.0);
        channel.linear_to(1.0, 1.0);
        channel.advance(0.2);
        channel.snap(0.0);
        assert_eq!(channel.value(), 0.0);
        assert!(channel.is_settled());
        assert_eq!(channel.advance(0.5), 0.0);
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut channel = Channel::resting(0.0);
        channel.linear_to(1.0, 1.0);
        channel.advance(0.5);
        channel.linear_to(0.0, 0.5);
        assert_eq!(channel.target(), 0.0);
        let v = channel.advance(0.25);
        assert!(v < 0.51);
    }

    #[test]
    fn zero_duration_transition_snaps() {
        let mut channel = Channel::resting(0.0);
        channel.linear_to(1.0, 0.0);
        assert_eq!(channel.value(), 1.0);
        assert!(channel.is_settled());
    }
}
