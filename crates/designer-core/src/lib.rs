//! Designer Core Library
//!
//! In-memory engine behind the design canvas: the element model, transform
//! math, grouping and z-order, undo/redo history, and artboard layout.
//! Every edit takes a state snapshot and returns a new one.

pub mod artboard;
pub mod canvas;
pub mod color;
pub mod command;
pub mod config;
pub mod document;
pub mod element;
pub mod elements;
pub mod error;
pub mod history;
pub mod navigation;
pub mod presets;
pub mod session;
pub mod snap;
pub mod transform;

pub use artboard::Artboard;
pub use canvas::{CanvasState, GridSettings};
pub use command::{Command, CommandFactory, CommandType, ElementSnapshot};
pub use config::DesignerConfig;
pub use document::{Document, Page};
pub use element::{CanvasElement, ElementId, ElementKind, ElementPatch, Transform};
pub use error::{DesignerError, DesignerResult};
pub use history::HistoryManager;
pub use navigation::Viewport;
pub use presets::{ARTBOARD_PRESETS, ArtboardPreset};
pub use session::DesignSession;
pub use snap::{GRID_SIZE, snap_to_grid};
pub use transform::{AlignTo, Alignment, DistributeDirection, ResizeHandle};
