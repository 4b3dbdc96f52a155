pub mod beams;
pub mod dispatch;
pub mod validate;
