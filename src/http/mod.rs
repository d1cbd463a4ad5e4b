//! HTTP query layer built on Rocket

pub mod logger;
pub mod params;
pub mod render;
pub mod routes;

use std::net::IpAddr;

use rocket::{Build, Rocket};

use crate::http::logger::RequestLogger;
use crate::mail::QueryService;

/// Assemble the Rocket instance serving the listing routes.
///
/// Rocket's own logger is silenced; requests are logged through `tracing`.
pub fn build(query: QueryService, address: IpAddr, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", address))
        .merge(("port", port))
        .merge(("log_level", "off"))
        .merge(("cli_colors", false));

    rocket::custom(figment)
        .attach(RequestLogger)
        .manage(query)
        .mount("/", routes::all())
}
