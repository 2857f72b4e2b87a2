//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use rest_dispatch::config::ServerConfig;
use rest_dispatch::error::RenderError;
use rest_dispatch::negotiation::representer::media;
use rest_dispatch::negotiation::{Model, Representer, RepresenterDescriptor, Token, Variant};
use rest_dispatch::{Dispatcher, HttpServer, Response, Shutdown};
use tokio::net::TcpListener;

/// A representer whose body is its own name.
#[derive(Debug)]
pub struct Stub {
    pub name: &'static str,
    pub descriptor: RepresenterDescriptor,
}

impl Representer for Stub {
    fn name(&self) -> &str {
        self.name
    }

    fn descriptor(&self) -> &RepresenterDescriptor {
        &self.descriptor
    }

    fn render(&self, _: &Model, variant: &Variant, response: &mut Response) -> Result<(), RenderError> {
        variant.apply_headers(response);
        response.set_body(self.name);
        Ok(())
    }
}

/// A stub offering one advertised media type for every model.
pub fn stub(name: &'static str, mime: &str, millis: u16) -> Stub {
    Stub {
        name,
        descriptor: RepresenterDescriptor::new()
            .media_type(media(mime, millis).advertised())
            .any_charset()
            .any_language()
            .all_models(),
    }
}

/// A stub matching anything at q=0.001, reporting `alias` as its type.
pub fn catch_all(name: &'static str, alias: (&str, &str)) -> Stub {
    Stub {
        name,
        descriptor: RepresenterDescriptor::new()
            .media_type(media("*/*", 1).with_alias(Token::media_type(alias.0, alias.1)))
            .any_charset()
            .any_language()
            .all_models(),
    }
}

/// Serve `dispatcher` on an ephemeral local port.
pub async fn start_server(config: ServerConfig, dispatcher: Dispatcher) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

/// A client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
