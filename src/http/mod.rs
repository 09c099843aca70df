//! Request dispatch layer

pub mod handlers;
pub mod route;
pub mod types;
