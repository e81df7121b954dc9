//! HR vertical slice.
//!
//! The catalog (companies and projects) is read-only here. Employees are
//! created through [`employees::add_employee`] and afterwards only change
//! when a change request is approved through [`changes::approve`].

pub mod catalog;
pub mod changes;
pub mod employees;
mod error;
pub mod presentation;
pub mod seed;

pub use error::{HrError, HrResult};
