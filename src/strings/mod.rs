//! # Strings Module
//!
//! Centralizes log and console text so wording stays consistent.

pub mod logs;
