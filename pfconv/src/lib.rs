// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    ensure_svg_dir, expand_dir, format_summary, svg_path_for, validate_region_name,
};
