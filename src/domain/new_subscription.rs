use crate::domain::PushEndpoint;

#[derive(Debug)]
pub struct NewSubscription {
    pub endpoint: PushEndpoint,
    pub keys: serde_json::Value,
    pub expiration_time: Option<i64>,
}
