//! Introspection routes.
//!
//! `GET /debug/routes` lists every rule in dispatch order and
//! `GET /debug/representers` lists representers in negotiation order with
//! the models they claim and the media types they offer. Both answer with
//! ordinary models, so clients negotiate their format like any other
//! resource.

use serde_json::{json, Value};

use crate::http::Request;
use crate::negotiation::{Model, RepresentationManager};
use crate::routing::{RoutePattern, RouteTable};

pub const ROUTES_PATH: &str = "/debug/routes";
pub const REPRESENTERS_PATH: &str = "/debug/representers";

/// Append both debug routes to `routes`.
pub(crate) fn register(routes: &mut RouteTable, representers: &RepresentationManager) {
    let mut listing: Vec<Value> = routes
        .iter()
        .map(|rule| describe_rule(&rule.method, &rule.pattern))
        .collect();

    for path in [ROUTES_PATH, REPRESENTERS_PATH] {
        if let Ok(pattern) = RoutePattern::new(&regex::escape(path)) {
            listing.push(describe_rule("GET", &pattern));
        }
    }

    let routes_model = Model::object("RouteTable", json!({ "routes": listing }));
    let representers_model = Model::object(
        "RepresentationManager",
        json!({ "representers": describe_representers(representers) }),
    );

    for (path, model) in [(ROUTES_PATH, routes_model), (REPRESENTERS_PATH, representers_model)] {
        let registered = routes.register_route("GET", &regex::escape(path), move |_: &Request| {
            Ok(model.clone())
        });
        if let Err(e) = registered {
            tracing::error!(error = %e, "Failed to register debug route");
        }
    }
}

fn describe_rule(method: &str, pattern: &RoutePattern) -> Value {
    json!({
        "method": method,
        "pattern": pattern.as_str(),
        "params": pattern.param_names().collect::<Vec<_>>(),
    })
}

fn describe_representers(manager: &RepresentationManager) -> Vec<Value> {
    manager
        .representers()
        .iter()
        .map(|representer| {
            let descriptor = representer.descriptor();
            let media_types: Vec<Value> = descriptor
                .media_types()
                .iter()
                .map(|t| {
                    json!({
                        "type": t.token.to_string(),
                        "quality": t.quality.to_string(),
                        "advertised": t.advertised,
                    })
                })
                .collect();
            json!({
                "name": representer.name(),
                "models": descriptor.model_labels(),
                "media_types": media_types,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representers::JsonRepresenter;

    #[test]
    fn test_routes_listing_includes_itself() {
        let mut routes = RouteTable::new();
        routes
            .register_route("POST", r"/items/(?P<id>\d+)", |_: &Request| Ok(Model::new(json!(null))))
            .unwrap();
        register(&mut routes, &RepresentationManager::new());

        let mut req = Request::new("GET", ROUTES_PATH);
        let model = routes.dispatch(&mut req).unwrap();
        assert_eq!(model.class(), Some("RouteTable"));

        let listed = model.value()["routes"].as_array().unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0]["method"], "POST");
        assert_eq!(listed[0]["params"], json!(["id"]));
        assert_eq!(listed[1]["pattern"], "/debug/routes");
    }

    #[test]
    fn test_representers_listing() {
        let mut manager = RepresentationManager::new();
        manager.register(JsonRepresenter::new());
        let mut routes = RouteTable::new();
        register(&mut routes, &manager);

        let mut req = Request::new("GET", REPRESENTERS_PATH);
        let model = routes.dispatch(&mut req).unwrap();
        let first = &model.value()["representers"][0];
        assert_eq!(first["name"], "json");
        assert_eq!(first["media_types"][0]["type"], "application/json");
        assert_eq!(first["media_types"][0]["quality"], "1.000");
        assert_eq!(first["media_types"][0]["advertised"], true);
    }
}
