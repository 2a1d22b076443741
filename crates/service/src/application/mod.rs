//! Hall-seat applications: public submission, administrative review.

pub mod repository;
pub mod service;

pub use service::ApplicationService;
