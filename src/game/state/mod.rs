pub mod frame_clock;
pub mod session;

pub use frame_clock::FrameClock;
pub use session::{BouncePhase, Session};
