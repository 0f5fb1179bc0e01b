pub mod channel;
pub mod feed;
pub mod geometry;
pub mod schedule;
pub mod time;

pub use channel::*;
pub use feed::*;
pub use geometry::*;
pub use schedule::*;
pub use time::*;
