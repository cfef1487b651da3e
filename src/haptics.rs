use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

/// Abstract haptic surface: repeated impact pulses while filling, plus one
/// success notification on completion. Fire-and-forget; no return values.
pub trait HapticSink {
    /// Impact pulse with intensity in [0, 1]. Out-of-range values are clamped
    /// by the caller.
    fn impact(&mut self, intensity: f32);

    /// Success notification, once per completed hold.
    fn success(&mut self);
}

/// Discards all pulses. Used when no actuator is available.
pub struct NullHaptics;

impl HapticSink for NullHaptics {
    fn impact(&mut self, _intensity: f32) {}
    fn success(&mut self) {}
}

/// Desktop stand-in for a physical actuator: pulses land in the debug log.
pub struct LogHaptics;

impl HapticSink for LogHaptics {
    fn impact(&mut self, intensity: f32) {
        debug!("haptic impact, intensity {intensity:.2}");
    }

    fn success(&mut self) {
        debug!("haptic success");
    }
}

/// Recording sink for tests. Clones share the same log.
#[derive(Default, Clone)]
pub struct MockHaptics {
    pub log: Rc<RefCell<HapticLog>>,
}

#[derive(Default)]
pub struct HapticLog {
    pub impacts: Vec<f32>,
    pub successes: usize,
}

impl MockHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn impacts(&self) -> Vec<f32> {
        self.log.borrow().impacts.clone()
    }

    pub fn impact_count(&self) -> usize {
        self.log.borrow().impacts.len()
    }

    pub fn success_count(&self) -> usize {
        self.log.borrow().successes
    }
}

impl HapticSink for MockHaptics {
    fn impact(&mut self, intensity: f32) {
        self.log.borrow_mut().impacts.push(intensity);
    }

    fn success(&mut self) {
        self.log.borrow_mut().successes += 1;
    }
}
