// Forwarding pipeline module

pub mod body;
pub mod headers;
pub mod hooks;
pub mod pipeline;
pub mod response;
pub mod target;

pub use hooks::Intercepted;
pub use pipeline::{ClientRequest, Proxy, ProxyBuilder, ProxyOutcome};
pub use response::ProxyResponse;
pub use target::{HostSpec, Target};
