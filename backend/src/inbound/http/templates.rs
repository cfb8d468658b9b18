//! Embedded page and fragment templates rendered with minijinja.

use minijinja::Environment;
use serde::Serialize;
use tracing::error;

use crate::domain::Error;

/// Template names, relative to `backend/templates`.
pub mod names {
    /// Shared page layout.
    pub const BASE: &str = "base.html";
    /// Project and parcel overview.
    pub const DASHBOARD: &str = "dashboard.html";
    /// Parcel entry form.
    pub const PARCEL_FORM: &str = "formulario_terrenos.html";
    /// Health badge fragment.
    pub const HEALTH_STATUS: &str = "fragments/health_status.html";
    /// Latest parcels fragment.
    pub const PARCEL_LIST: &str = "fragments/terrenos_list.html";
}

const SOURCES: [(&str, &str); 5] = [
    (names::BASE, include_str!("../../../templates/base.html")),
    (names::DASHBOARD, include_str!("../../../templates/dashboard.html")),
    (
        names::PARCEL_FORM,
        include_str!("../../../templates/formulario_terrenos.html"),
    ),
    (
        names::HEALTH_STATUS,
        include_str!("../../../templates/fragments/health_status.html"),
    ),
    (
        names::PARCEL_LIST,
        include_str!("../../../templates/fragments/terrenos_list.html"),
    ),
];

/// Compiled template set shared by page and fragment handlers.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Compile every embedded template.
    ///
    /// # Errors
    ///
    /// Returns the minijinja error for the first template that fails to parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in SOURCES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render a template with a serialisable context.
    pub fn render<C: Serialize>(&self, name: &str, context: C) -> Result<String, Error> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(context))
            .map_err(|err| {
                error!(template = name, error = %err, "template rendering failed");
                Error::internal(format!("failed to render {name}"))
            })
    }
}
