pub mod animation;
pub mod field;
