//! Graph-learning math utilities.

pub mod math;

pub use math::constraints::*;
pub use math::duplication::*;
pub use math::qp::*;
pub use math::vech::*;
