//! Binary persistence for animations.

pub mod chunk;
pub mod codec;

pub use codec::{load, save, VERSION};
