//! Cactus Kev hand evaluator: 7-card best-5 scoring against precomputed tables.
mod evaluator;
mod tables;

pub use evaluator::eval5;
pub use evaluator::eval7;
pub use evaluator::hand_name;
pub use evaluator::init;
