//! Infrastructure layer - filesystem, token signing and logging

pub mod auth;
pub mod fs;
pub mod logging;
