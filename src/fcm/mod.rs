pub mod client;
pub mod types;

pub use client::FcmClient;
pub use types::{AndroidPriority, NotificationPayload};
