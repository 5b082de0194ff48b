//! # lanvakt-core
//!
//! Foundation types shared by every lanvakt crate.
//!
//! ### Key Submodules:
//! - `identity`: the local hardware address used to tell own traffic from foreign traffic
//! - `window`: per-query sampling parameters (interface + timeout)
//! - `result`: the closed set of categories and the per-cycle outcome

pub mod error;
pub mod identity;
pub mod result;
pub mod window;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::identity::*;
    pub use crate::result::*;
    pub use crate::window::*;
}

pub use error::CoreError;
pub use identity::HostIdentity;
pub use result::{Category, CycleResult};
pub use window::SamplingWindow;
