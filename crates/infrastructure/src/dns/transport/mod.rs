pub mod https;

pub use https::HttpsUpstream;
