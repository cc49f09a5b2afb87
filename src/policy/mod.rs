//! Window policy definitions.

pub mod window;

pub use window::WindowPolicy;
