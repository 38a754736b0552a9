//! Core domain types shared across modules

pub mod error;
pub mod goal;
pub mod message;
pub mod model;
