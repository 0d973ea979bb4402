// Providers layer - Work performers and business logic
//
// Providers hold the access rules and token handling that the gate, the
// handlers and the CLI share.

pub mod access_provider;
pub mod scope_provider;
pub mod token_provider;

pub use access_provider::AccessProvider;
pub use scope_provider::ScopeProvider;
pub use token_provider::TokenProvider;
