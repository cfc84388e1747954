//! Command implementations.

mod convert;
mod grf;
mod info;
mod slice;
mod validate;

pub use convert::run_convert;
pub use grf::run_grf;
pub use info::run_info;
pub use slice::run_slice;
pub use validate::run_validate;
