//! Command handlers

pub mod add;
pub mod check;
pub mod list;
