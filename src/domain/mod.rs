//! Domain layer - Pure business logic.

pub mod av;
pub mod locator;
pub mod policy;
pub mod requests;
pub mod staging;
