//! # TV shell controller core
//!
//! Native-side state for a TV web shell hosting a single-page app:
//!
//! - [`NavigationResolver`] turns a remote "back" press into exactly one
//!   of: close the top overlay, close the detail/player view, return home
//!   from search results, or leave the activity. The page is asked via a
//!   probe script compiled from an ordered [`ProbeTable`].
//! - [`PresentationController`] switches between windowed and immersive
//!   display, re-applying status bar padding on platforms that force
//!   edge-to-edge drawing.
//!
//! Both run on the UI thread. Calls from page script ([`FullscreenBridge`])
//! and script replies are posted to a [`UiQueue`] and dispatched from
//! there.
//!
//! ```rust
//! use tvshell_core::*;
//!
//! let resolver = NavigationResolver::from_config(&ShellConfig::default()).unwrap();
//! assert!(resolver.script().contains("closed_popup"));
//! assert_eq!(NavigationQueryResult::parse("\"went_home\""), NavigationQueryResult::WentHome);
//! ```

pub mod bridge;
pub mod color;
pub mod config;
pub mod error;
pub mod host;
pub mod navigation;
pub mod presentation;
pub mod probe;
pub mod ui;
pub mod window;

pub use bridge::*;
pub use color::*;
pub use config::*;
pub use error::*;
pub use host::*;
pub use navigation::*;
pub use presentation::*;
pub use probe::*;
pub use ui::*;
pub use window::*;
