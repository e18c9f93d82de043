pub mod bbox;
pub mod exact;
pub mod fixed;
pub mod polygon;
pub mod r2;
pub mod tree;
