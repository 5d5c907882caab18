//! External integrations
//!
//! The sync core talks to collaborators only through the traits in
//! [`traits`]; the submodules here provide the shipped implementations:
//!
//! - [`openmrs`] - source store over the OpenMRS REST API
//! - [`dhis2`] - destination upload over the DHIS2 REST API
//! - [`staging`] - per-patient JSON artifact writer

pub mod dhis2;
pub mod openmrs;
pub mod staging;
pub mod traits;

pub use traits::{SourceConnector, UnitProcessor, UploadHandler};
