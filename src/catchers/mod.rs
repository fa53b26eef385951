mod bad_request;
mod internal_error;
mod not_found;
mod unauthorized;

pub use bad_request::*;
pub use internal_error::*;
pub use not_found::*;
pub use unauthorized::*;
