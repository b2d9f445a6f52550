pub mod config;
pub mod engine;
pub mod error;
pub mod track;

pub use config::{AppConfig, CarouselConfig, GeneralConfig, UiConfig};
pub use engine::{Clock, LoopAnimator, ManualClock, RunState, Segment, Snapshot, SystemClock};
pub use error::{Error, Result};
pub use track::{Measure, Placement, Track};
