//! Playback synchronisation
//!
//! [`PlaybackMachine`] owns one race view's clock. It is synchronous and
//! driven by [`PlaybackMachine::tick`], so tests can step time by hand with a
//! [`ManualClock`] while the async driver ticks it from a tokio interval.

mod clock;
mod live;
mod machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use live::{is_live, live_elapsed};
pub use machine::{PlaybackCommand, PlaybackMachine, PlaybackState};
