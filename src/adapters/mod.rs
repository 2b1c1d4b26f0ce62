pub mod api_errors;
pub mod extract;
pub mod rate_limit;
pub mod router;
pub mod routes;
pub mod security_headers;
