//! `ck-domain`: shared kernel for the cordkit crates: the error taxonomy,
//! configuration, platform models, trace events and the
//! [`EndpointResolver`](resolver::EndpointResolver) seam between the REST
//! client and the gateway session.

pub mod config;
pub mod error;
pub mod model;
pub mod resolver;
pub mod trace;

pub use error::{Error, Result};
