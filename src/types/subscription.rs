use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A browser push subscription as produced by `PushSubscription.toJSON()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub endpoint: String,
    #[serde(
        rename = "expirationTime",
        alias = "expiration_time",
        default
    )]
    pub expiration_time: Option<i64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Subscription body as received over HTTP, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionRequest {
    pub endpoint: Option<String>,
    #[serde(rename = "expirationTime", alias = "expiration_time", default)]
    pub expiration_time: Option<i64>,
    pub keys: Option<SubscriptionKeys>,
}

impl SubscriptionRequest {
    pub fn endpoint(&self) -> Result<&str, Error> {
        match self.endpoint.as_deref() {
            Some(endpoint) if !endpoint.trim().is_empty() => Ok(endpoint),
            _ => Err(Error::MissingParams(String::from("endpoint"))),
        }
    }

    pub fn into_subscription(self) -> Result<Subscription, Error> {
        let endpoint = self.endpoint()?.to_owned();
        let keys = self
            .keys
            .ok_or_else(|| Error::MissingParams(String::from("keys")))?;

        Ok(Subscription {
            endpoint,
            expiration_time: self.expiration_time,
            keys,
        })
    }
}
