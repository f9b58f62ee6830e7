pub mod client;

pub use client::CryptoPanicClient;
