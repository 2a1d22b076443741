//! Notice board: public reads, admin-only writes.

pub mod repository;
pub mod service;

pub use service::NoticeService;
