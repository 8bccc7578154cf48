//! Feature domain: the fixed input schema and record-to-vector projection.

pub mod domain;
pub mod service;

pub use domain::{
    feature_names, FeatureSpec, FeatureVector, InputRecord, Strictness, FEATURE_COUNT,
    FEATURE_SCHEMA,
};
