//! Globe viewer application: window, event loop, orbit controls and the
//! per-frame spin-and-draw cycle.

pub mod controls;
pub mod frame_clock;
pub mod input;
pub mod platform;
pub mod resize;
pub mod window;

pub use controls::OrbitControls;
pub use frame_clock::FrameClock;
pub use input::PointerState;
pub use platform::{PlatformDirs, PlatformError};
pub use window::{AppError, AppState, run_with_config};
