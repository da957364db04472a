//! Quill server library.
//!
//! Core functionality for the Quill blogging platform: authentication,
//! authorization, user relationships, posts, and comments.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
