#![doc = "The `taskhub` library crate."]
#![doc = ""]
#![doc = "Domain models, the authentication core (password hashing, signed bearer tokens"]
#![doc = "and the request gate), user and task services over pluggable stores, and the"]
#![doc = "HTTP routes. The binary (`main.rs`) wires these together from `Config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
