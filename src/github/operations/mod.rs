// Size fetch operations, one per API path
pub mod graphql;
pub mod rest;

pub use graphql::AuthenticatedSizeFetcher;
pub use rest::AnonymousSizeFetcher;
