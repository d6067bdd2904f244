//! Chain access: the state-fetch capability, the HTTP implementation, and
//! the resolver that tolerates both storage layouts.

pub mod addresses;
mod http;
mod resolver;
mod service;

pub use self::http::HttpStateService;
pub use self::resolver::StateResolver;
pub use self::service::{StateError, StateService};
