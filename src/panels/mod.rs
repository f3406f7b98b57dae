pub mod central_panel;
pub mod tools_panel;

pub use central_panel::{CanvasView, central_panel};
pub use tools_panel::tools_panel;
