pub mod errors;
pub mod fields;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod student_profile;
pub mod application;
pub mod notice;

#[cfg(test)]
mod tests;
