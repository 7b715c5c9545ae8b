//! Formwork Demo -- headless walkthrough of a schema's forms.
//!
//! Loads a schema, links forms to each other through their assembly fields,
//! fills and submits every form against a stand-in backend, and renders the
//! resulting views as plain text.

pub mod config;
pub mod error;
pub mod render;
pub mod runner;
pub mod submitter;
