//! Listing endpoints, as HTML pages and as JSON.

use std::sync::Arc;

use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{Route, State, get, routes};

use crate::http::params::CriteriaParams;
use crate::http::render;
use crate::mail::{Message, QueryService};

/// Every route served by the query layer
pub fn all() -> Vec<Route> {
    routes![list_emails, list_emails_to, api_list_emails, api_list_emails_to]
}

/// HTML page of all messages matching the query criteria
#[get("/emails?<criteria..>")]
pub fn list_emails(query: &State<QueryService>, criteria: CriteriaParams) -> RawHtml<String> {
    let messages = query.get_emails(&criteria.to_criteria());
    RawHtml(render::emails_page("E-mails", &messages))
}

/// HTML page of messages addressed to `address`
#[get("/emails/<address>?<criteria..>")]
pub fn list_emails_to(
    query: &State<QueryService>,
    address: &str,
    criteria: CriteriaParams,
) -> RawHtml<String> {
    let messages = query.get_emails_to(address, &criteria.to_criteria());
    RawHtml(render::emails_page(&format!("E-mails to {address}"), &messages))
}

/// JSON array of all messages matching the query criteria
#[get("/api/emails?<criteria..>")]
pub fn api_list_emails(
    query: &State<QueryService>,
    criteria: CriteriaParams,
) -> Json<Vec<Arc<Message>>> {
    Json(query.get_emails(&criteria.to_criteria()))
}

/// JSON array of messages addressed to `address`
#[get("/api/emails/<address>?<criteria..>")]
pub fn api_list_emails_to(
    query: &State<QueryService>,
    address: &str,
    criteria: CriteriaParams,
) -> Json<Vec<Arc<Message>>> {
    Json(query.get_emails_to(address, &criteria.to_criteria()))
}
