//! Skincare core library
//!
//! Local profile and collection store for the skincare companion app:
//! skin profile, routines, progress log and wishlist, kept in memory and
//! mirrored to on-device key-value storage.

pub mod app;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
