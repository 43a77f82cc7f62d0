//! HTTP request handlers

pub mod chat;
pub mod chat_ws;
pub mod health;
