pub mod error_details;
pub mod security_headers;

pub use error_details::{error_details_middleware, ErrorDetailsConfig};
pub use security_headers::{security_headers_middleware, SecurityHeadersConfig};
