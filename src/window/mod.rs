//! Window layer
//!
//! Frames decorate views with a title bar and a close button. The
//! [`ViewManager`] keeps them stacked and routes input to them.

pub mod frame;
pub mod manager;
pub mod surface;

pub use frame::{Frame, FrameHit, FrameId};
pub use manager::ViewManager;
pub use surface::{BufferSurface, Surface};
