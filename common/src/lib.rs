pub mod cancel_token;
pub mod file_format;
pub mod float_ext;
pub mod log_setup;
pub mod parallel;
pub mod test_utils;

pub use cancel_token::CancelToken;
pub use file_format::{get_file_extension, FileExtensionError, FileFormatResult};
pub use float_ext::FloatExt;

pub const EPSILON: f64 = 1e-6;
