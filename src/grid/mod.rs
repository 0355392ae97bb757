pub mod field;

pub use field::PotentialGrid;
