//! Core library for vrctools - a command-line avatar manager for VRChat.
//!
//! This crate provides:
//! - `api`: the VRChat REST client and its error types
//! - `auth`: credential prompting, the persisted token store and the
//!   authenticated session identity
//! - `avatars`: pagination, listing and interactive deletion of avatars
//! - `config`: environment-driven configuration and application metadata
//! - `models`: API data models

pub mod api;
pub mod auth;
pub mod avatars;
pub mod config;
pub mod models;
