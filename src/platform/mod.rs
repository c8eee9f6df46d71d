//! Platform abstraction layer
//!
//! Input events arrive whenever the host delivers them; they only touch
//! the buffer here. The frame driver samples the buffer once per tick.

pub mod input;

pub use input::InputBuffer;
