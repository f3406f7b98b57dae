#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod frame;
pub mod gesture;
pub mod history;
pub mod input;
pub mod panels;
pub mod raster;
pub mod shapes;
pub mod style;
pub mod surface;
pub mod text;
pub mod texture_manager;
pub mod tool;

pub use app::SketchApp;
pub use command::{Command, Outcome};
pub use config::SketchConfig;
pub use editor::Editor;
pub use error::{CanvasError, CanvasResult};
pub use export::{ExportFormat, ExportedImage};
pub use frame::Frame;
pub use history::History;
pub use style::StyleState;
pub use surface::RasterSurface;
pub use tool::Tool;
