pub mod entity;
pub mod rules;
