//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, token refresh and the profile-completion workflow live here;
//! `token` issues and checks the JWT pair.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use service::AuthService;
pub use token::{Claims, TokenIssuer, TokenKind};
