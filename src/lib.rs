#[macro_use]
extern crate rocket;

pub mod catchers;
pub mod client;
pub mod configuration;
pub mod cors;
pub mod domain;
pub mod guards;
pub mod models;
pub mod port_saver;
pub mod push;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
