//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access; repositories are injected as trait objects.
//! - Reuses validation and entity definitions in `models` crate.
//! - Each repository has a SeaORM implementation and an in-memory mock.

pub mod errors;
pub mod auth;
pub mod application;
pub mod notice;
pub mod media;
#[cfg(test)]
pub mod test_support;
