pub mod normal;

pub use normal::NormalSequence;
