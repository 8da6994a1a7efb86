//! Order management backend: customer directory, product catalog and order
//! reconciliation behind an actix-web REST API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
pub use domain::TraceId;
