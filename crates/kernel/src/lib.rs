//! Kernel of the bookshelf service: layered settings, the module lifecycle
//! contract, and the registry that drives it.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use settings::Settings;
