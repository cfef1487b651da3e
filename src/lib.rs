// Library surface for headless/integration tests and the demo binary.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod anim;
pub mod audio;
pub mod binding;
pub mod button;
pub mod clock;
pub mod config;
pub mod haptics;
pub mod ripple;
pub mod runtime;
pub mod scheduler;
pub mod ui;

pub use binding::{LabelBinding, Point};
pub use button::{HoldButton, HoldPhase};
pub use config::HoldStyle;
