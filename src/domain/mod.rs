mod new_subscription;
mod push_endpoint;
mod vapid_public_key;

pub use new_subscription::NewSubscription;
pub use push_endpoint::PushEndpoint;
pub use vapid_public_key::VapidPublicKey;
