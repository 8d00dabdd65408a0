//! Built-in extensions
//! 
//! Each module is one command group. The catalog maps identifiers to the
//! `create` constructors below; the extension directory decides which load.

pub mod trait_def;
pub mod general;
pub mod fun;
pub mod moderation;
pub mod owner;

pub use trait_def::{Extension, ExtensionConstructor};
