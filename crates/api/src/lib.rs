pub mod background;
pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod source;
pub mod state;
