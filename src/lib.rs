pub mod bot;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod identity;
pub mod matrix;
pub mod openrouter;
pub mod policy;
pub mod provider;
pub mod transport;
pub mod types;

pub use bot::run;
