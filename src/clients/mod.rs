pub mod backend;
pub mod envelope;
pub mod http_backend;

pub use backend::Backend;
pub use http_backend::HttpBackend;
