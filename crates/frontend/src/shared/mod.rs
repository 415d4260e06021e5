pub mod channel;
pub mod components;
pub mod config;
pub mod modal;
pub mod toast;
