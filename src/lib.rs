//! chunkmill - AI-Annotated Markdown Chunk Generator
//!
//! A batch pipeline that turns Python design-pattern sources into Markdown
//! "chunks" (front matter + code block + generated summary + docstring
//! suggestions) plus a flat JSON summary index for
//! retrieval-augmented-generation use.
//!
//! ## Pipeline
//!
//! Source Enumerator → Code Extractor → Annotator → Chunk Writer →
//! Validator, looped per file by a bounded retry orchestrator; the Summary
//! Index Builder runs once over the finished chunk directory. A file either
//! ends with a fully valid chunk on disk or with no chunk at all, and
//! permanently failed files are appended to a shared failure log.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chunkmill::{ChunkContext, ChunkPipeline, PipelineOptions, ServiceConfig, create_service};
//!
//! let service = create_service(&ServiceConfig::default())?;
//! let pipeline = ChunkPipeline::new(
//!     ChunkContext::new("patterns", "chunks"),
//!     service,
//!     PipelineOptions::default(),
//! );
//! let report = pipeline.run().await?;
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: source discovery and Python declaration extraction
//! - [`ai`]: annotation service abstraction (Ollama-backed)
//! - [`pipeline`]: per-file retry state machine, chunk writing, validation
//! - [`indexer`]: summary index rebuild
//! - [`config`]: layered configuration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod indexer;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::{Annotation, ChunkError, IndexEntry, Result, SourceFile};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{
    ChunkContext, ChunkPipeline, FileOutcome, PipelineOptions, PipelineReport, Section,
    SkipReason, derive_chunk_name, missing_sections, validate_chunk,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{AnnotationService, OllamaService, ServiceConfig, SharedService, create_service};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{SourceScanner, extract_declarations};

// =============================================================================
// Indexer Re-exports
// =============================================================================

pub use indexer::{build_index, write_index};
