//! Content page rewrites.
//!
//! In-place edits of the documentation sources: import insertion for MDX
//! pages and figure shortcode conversion.

pub mod images;
pub mod imports;

pub use images::replace_images;
pub use imports::{add_imports, ImportOptions, ImportOutcome};
