//! Authentication: session lifecycle, token expiry, credential storage.
//!
//! - `Session` / `SessionData`: the client-held authentication state, with
//!   silent refresh and disk persistence
//! - `token`: expiry instant from the access token's `exp` claim
//! - `CredentialStore`: OS-level password storage via keyring

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::CredentialStore;
pub use session::{RefreshedTokens, Session, SessionData};
