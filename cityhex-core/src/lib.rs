mod core_error;
pub mod diagnostics;
pub mod model;
pub mod util;

pub use core_error::CoreError;
