// Middleware module - logging and security headers.

pub mod request_logger;
pub mod security_headers;

pub use request_logger::{auth_logger_middleware, request_logger_middleware};
pub use security_headers::add_security_headers;
