//! Ports - Trait definitions implemented by adapters.

pub mod media;
pub mod storage;
