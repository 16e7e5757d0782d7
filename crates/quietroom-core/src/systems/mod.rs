//! Systems that advance the simulation each tick.
//!
//! Systems are free functions over the world. They collect changes first
//! and apply them afterward, so queries never alias a mutable borrow.

mod focus;
mod growth;
mod motion;

pub use focus::*;
pub use growth::*;
pub use motion::*;
