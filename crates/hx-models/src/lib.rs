//! # hx-models
//!
//! Data models for the Crimson Hexagon ForSight API.
//!
//! This crate provides the validation pipeline for bulk content upload and
//! monitor training (raw records checked field by field into immutable,
//! de-duplicated collections with structured field-path errors), the
//! 24-hour analysis request model, and typed response structures for the
//! endpoints whose payloads the rest of the workspace interprets.
//!
//! ## Usage
//!
//! ```ignore
//! use hx_models::upload::{UploadCollection, UploadItemInput};
//!
//! let inputs: Vec<UploadItemInput> = serde_json::from_str(&raw_records)?;
//! let collection = UploadCollection::from_inputs(inputs)?;
//! assert!(collection.len() >= 1);
//! ```

#![warn(clippy::all)]

pub mod analysis;
pub mod datetime;
pub mod responses;
pub mod train;
pub mod upload;
pub mod validation;

// Re-export the working set for convenience
pub use analysis::{AnalysisRequest, AnalysisRequestInput};
pub use responses::*;
pub use train::{TrainCollection, TrainItem, TrainItemInput};
pub use upload::{ContentDeleteItem, Geolocation, UploadCollection, UploadItem, UploadItemInput};
pub use validation::{FieldError, ValidationErrors};
