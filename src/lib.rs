//! # cvd-risk
//!
//! Cardiovascular-disease risk prediction with a preprocessor that reproduces
//! the transformation the model was trained with.
//!
//! The preprocessor is fitted once against a reference dataset:
//!
//! - nominal columns are one-hot encoded with the first category dropped
//! - ordinal columns are mapped to fixed, domain-defined ranks
//! - numerical columns are `log1p`-transformed, then standardized
//! - any other reference column passes through unchanged
//!
//! The fitted preprocessor and a loaded [`model::Model`] form a
//! [`service::PredictionService`], served over HTTP by [`server`].

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod preprocess;
pub mod server;
pub mod service;

pub use error::{Error, Result};
