//! Input decoding: key mapping and pointer gestures.

pub mod click;
pub mod keymap;

pub use click::{ClickDisambiguator, PointerEvent, PointerTracker};
pub use keymap::{KeyAction, KeyBinding, KeyMapper};
