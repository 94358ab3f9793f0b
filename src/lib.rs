//! Brandforge core library.
//!
//! This crate provides the training-and-generation orchestrator for
//! personalized brand image models:
//! - Asset packaging into trainable archives
//! - Idempotent model container provisioning
//! - Remote training launch and lazy status synchronization
//! - Inference execution with seed and result persistence
//! - HTTP clients for the model provider and object storage
//! - Record types and storage seams for brands, jobs, and images

pub mod artifacts;
pub mod config;
pub mod errors;
pub mod http;
pub mod naming;
pub mod orchestrator;
pub mod packaging;
pub mod polling;
pub mod provider;
pub mod shared_client;
pub mod status;
pub mod store;
pub mod urls;

// Re-export core types at crate root for convenience
pub use errors::{ForgeError, ForgeResult, HttpErrorInfo, TrainingErrorInfo};
pub use status::TrainingStatus;

// Re-export the orchestrator surface
pub use orchestrator::{
    GenerateImageRequest, GenerationOutcome, LaunchTrainingRequest, NewAsset, Orchestrator,
    RegisterBrandRequest,
};

// Re-export configuration
pub use config::{
    InferenceDefaults, OrchestratorConfig, TrainingDefaults, DEFAULT_ASPECT_RATIO,
    MIN_TRAINING_IMAGES,
};

// Re-export storage seams and records
pub use artifacts::{ArtifactStore, HttpArtifactStore};
pub use store::{Brand, GeneratedImage, MemoryStore, RecordStore, TrainingAsset, TrainingJob};

// Re-export the provider seam
pub use provider::{
    CreateModelOutcome, HttpModelProvider, InferenceRequest, ModelProvider, ModelSpec, RemoteJob,
    TrainingRequest,
};
