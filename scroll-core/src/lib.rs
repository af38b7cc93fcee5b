pub mod builder;
pub mod config;
pub mod format;
pub mod library;
pub mod markdown;
pub mod naming;
pub mod site;
pub mod template;

// Re-export main types
pub use builder::{BuildError, NavItem, RenderError, Site, SiteBuilder, SiteError, build_site};
pub use format::{FormatMode, HeadingLevels, format};
pub use library::{Library, LibraryScanner, LineEntry, LineGroup, ScanError};
pub use site::{Page, PageType};
pub use template::{TemplateError, TemplateRenderer};
