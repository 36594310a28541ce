//! HTTP handlers

pub mod health;
pub mod page;
pub mod predict;

#[cfg(test)]
mod tests;
