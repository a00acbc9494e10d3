//! Configuration management with environment variable support.

mod base;
mod salt;

pub use base::NonceConfig;
pub use salt::{decode_salt, generate_random_salt, SALT_LEN};
