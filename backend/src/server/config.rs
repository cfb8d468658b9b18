//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::DocumentStore;
use backend::inbound::http::pages::PageRoutes;
use backend::inbound::http::templates::Templates;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) templates: web::Data<Templates>,
    pub(crate) pages: PageRoutes,
}

impl ServerConfig {
    /// Construct a configuration using the system clock.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        store: Arc<dyn DocumentStore>,
        templates: web::Data<Templates>,
        pages: PageRoutes,
    ) -> Self {
        Self {
            bind_addr,
            store,
            clock: Arc::new(DefaultClock),
            templates,
            pages,
        }
    }

    /// Replace the clock used for record timestamps.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Used by server tests to pin timestamps")
    )]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
