//! Block state and model resolution.
//!
//! This module handles compiling blockstate selectors against a block's
//! state graph and resolving model inheritance chains.

pub mod condition;
pub mod model_resolver;
pub mod state_resolver;

pub use condition::Condition;
pub use model_resolver::{ModelCache, ModelDocument, ModelId, ModelRef};
pub use state_resolver::{Selection, VariantSelector};
