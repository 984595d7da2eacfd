//! map-symbol-renderer: procedural map-symbol icon generation
//!
//! This crate renders small monochrome map symbols (towns, crossroads,
//! hospitals, ...) with a randomized rotation, scale and offset, encodes them
//! as PNG and packs whole batches into a zip archive, one folder per
//! category.
//!
//! # Example
//!
//! ```
//! use map_symbol_renderer::{IconGenerator, RenderingEngine, EngineConfig, TransformSettings};
//! use rand::SeedableRng;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let engine = RenderingEngine::initialize(&EngineConfig::default()).await.unwrap();
//! let generator = IconGenerator::builtin(TransformSettings::default()).unwrap();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//!
//! let hospital = generator.registry().by_key("hospital").unwrap().id;
//! let icon = generator.generate(&engine, hospital, 64, &mut rng).unwrap();
//! assert_eq!(icon.dimensions().width, 64);
//! # });
//! ```
//!
//! # Batch Runs
//!
//! [`BatchPipeline`] drives N icons per selected category into an
//! [`ArchiveBuilder`] and hands the finished container to a [`Downloader`]:
//!
//! ```
//! use map_symbol_renderer::{
//!     BatchPipeline, DirectoryDownloader, GenerationRequest, GeneratorConfig,
//!     Progress, ZipArchiveBuilder,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let out = tempfile::tempdir().unwrap();
//! let pipeline =
//!     BatchPipeline::from_config(&GeneratorConfig::new(), DirectoryDownloader::new(out.path()))
//!         .unwrap();
//!
//! let request = GenerationRequest::parse("0,2", "5", "32").unwrap();
//! let outcome = pipeline
//!     .run(&request, ZipArchiveBuilder::new(), |p: &Progress| {
//!         println!("{}: {}/{}", p.category_label, p.produced, p.total)
//!     })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(outcome.produced(), 10);
//! assert!(out.path().join("map-symbols.zip").exists());
//! # });
//! ```

mod archive;
mod category;
mod config;
mod download;
mod drawer;
mod encoder;
mod engine;
mod error;
mod generator;
mod icon;
mod pipeline;
mod request;
mod surface;
mod transform;

pub use archive::{ArchiveBuilder, ZipArchiveBuilder, file_name, folder_name, slugify};
pub use category::{CategoryRegistry, SymbolCategory};
pub use config::{EngineConfig, GeneratorConfig, PipelineSettings, TransformSettings};
pub use download::{DirectoryDownloader, Downloader};
pub use drawer::{BUILTIN_DESIGNS, DrawFn, DrawerTable, SymbolDesign, circles, strokes};
pub use encoder::IconEncoder;
pub use engine::{EngineFactory, EngineHandle, RenderingEngine, SURFACE_SIZE_LIMIT};
pub use error::{ArchiveError, ConfigurationError, EngineError, Error, InputError, Result};
pub use generator::IconGenerator;
pub use icon::{Icon, SizePx};
pub use pipeline::{BatchPipeline, PipelineState, Progress, ProgressSink, RunOutcome};
pub use request::{
    GenerationRequest, MAX_COUNT, MAX_PIXEL_SIZE, MIN_COUNT, MIN_PIXEL_SIZE, clamp_count,
    clamp_pixel_size, parse_category_ids, parse_positive,
};
pub use surface::{SavedState, Surface};
pub use transform::{SymbolTransform, TransformContext, TransformSample, compensated_stroke};
