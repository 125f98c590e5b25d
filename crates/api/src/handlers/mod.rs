pub mod doh;
pub mod health;

pub use doh::{handle_doh, MAX_DNS_MESSAGE_SIZE};
pub use health::health_check;
