pub mod content;

pub use content::{fingerprint_file, hash_data, Fingerprint};
