pub mod assert;
pub mod context;
pub mod lifecycle;
pub mod source;
