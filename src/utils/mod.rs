// src/utils/mod.rs

pub mod hash;
pub mod redirect;
pub mod session;
