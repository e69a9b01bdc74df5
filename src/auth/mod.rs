//! Access-token lifecycle.
//!
//! The [`CredentialStore`] turns the long-lived refresh token into short-lived
//! access tokens and caches them until shortly before they expire.

mod store;

pub use store::CredentialStore;
