pub mod drift;
pub mod entity;
pub mod shape;
