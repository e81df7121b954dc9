//! Identity store: local accounts, signed bearer tokens and a
//! storage-backed revocation list.

mod error;
mod store;
mod token;

pub use error::{AuthnError, AuthnResult};
pub use store::{
    LoginOutcome, Principal, authenticate, find_user, login, logout, prune_expired, register,
};
pub use token::{AuthConfig, Claims, decode_token, issue_token};
