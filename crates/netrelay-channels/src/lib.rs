pub mod directive;
pub mod dispatch;
pub mod error;
pub mod mirror;
