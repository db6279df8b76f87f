pub mod util;

pub use util::{digest_text, split_csv};
