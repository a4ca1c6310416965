pub mod output;
pub mod table;
pub mod theme;

pub use output::{header, info, success, warn};
pub use table::files_table;
pub use theme::{theme, Theme};
