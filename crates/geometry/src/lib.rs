pub mod angle;
pub mod drag;
pub mod macros;
pub mod overlay;
pub mod point;
pub mod pointer;
pub mod radial;
pub mod viewport;
pub mod zone;

pub use point::Point;
