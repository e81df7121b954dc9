//! sea-orm models for the HR backend.

pub mod app_user;
pub mod change_request;
pub mod company;
pub mod employee;
pub mod project;
pub mod revoked_token;
