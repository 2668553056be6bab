pub mod bundle;
pub mod document;
pub mod error;
pub mod fetch;
pub mod registration;
pub mod resolver;
pub mod search;

pub use bundle::{FetchStatus, ResolvedBundle};
pub use document::Document;
pub use error::ScanError;
pub use fetch::{FetchOutcome, Fetcher, RedirectHop};
pub use registration::{RdapClient, RegistrationRecord};
pub use resolver::{Resolver, ResolverConfig};
pub use search::SearchClient;
