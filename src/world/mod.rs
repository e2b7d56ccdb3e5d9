//! Objects that live on the road: roadside scenery and rival racers
//!
//! Both kinds render through the same `WorldObject` call, anchored to the
//! near edge of the segment that owns them.

mod competitor;
mod object;
mod sprite;

pub use competitor::*;
pub use object::*;
pub use sprite::*;
