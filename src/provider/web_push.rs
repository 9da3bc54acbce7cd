use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;

use crate::{
    configuration::Config,
    error::Error,
    provider::HTTP,
    push::{DeliveryError, PushDelivery},
    types::{Claims, PushHeader, Subscription},
};

/// Push services reject VAPID tokens valid for more than 24 hours.
const VAPID_EXPIRATION_SECS: i64 = 12 * 60 * 60;

/// Web push delivery: VAPID (RFC 8292) signed, aes128gcm (RFC 8291)
/// encrypted, sent over the shared HTTP client.
pub struct WebPush {
    http: HTTP,
    key: EncodingKey,
    subject: String,
    push_header: PushHeader,
}

impl WebPush {
    pub fn new(config: Config, http: HTTP) -> Result<WebPush, Error> {
        let key = EncodingKey::from_ec_pem(&config.vapid_private_key)?;
        let subject = format!("mailto:{}", &config.mail_to);
        let push_header = PushHeader {
            ttl: config.push_ttl,
            urgency: config.push_urgency,
        };

        Ok(WebPush {
            http,
            key,
            subject,
            push_header,
        })
    }

    pub fn vapid_token(&self, endpoint: &str) -> Result<String, Error> {
        let url = Url::parse(endpoint)?;
        let scheme = url.scheme();
        let host = if let Some(h) = url.host() {
            h.to_string()
        } else {
            return Err(Error::InvalidOption {
                option: String::from("host"),
            });
        };

        let aud = match url.port() {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        };
        let exp = Utc::now().timestamp() + VAPID_EXPIRATION_SECS;
        let claims = Claims {
            aud,
            sub: self.subject.to_owned(),
            exp,
        };

        Ok(encode(&Header::new(Algorithm::ES256), &claims, &self.key)?)
    }

    async fn send_push(
        &self,
        subscription: &Subscription,
        payload: &[u8],
    ) -> Result<(u16, String), Error> {
        let token = self.vapid_token(&subscription.endpoint)?;

        let keys = &subscription.keys;
        let p256dh = BASE64_URL.decode(keys.p256dh.trim_end_matches('='))?;
        let auth = BASE64_URL.decode(keys.auth.trim_end_matches('='))?;
        let data = ece::encrypt(&p256dh, &auth, payload)?;

        self.http
            .post_push(&subscription.endpoint, token, &self.push_header, data)
            .await
    }
}

impl fmt::Debug for WebPush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPush")
            .field("subject", &self.subject)
            .field("push_header", &self.push_header)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PushDelivery for WebPush {
    async fn deliver(
        &self,
        subscription: &Subscription,
        payload: &[u8],
    ) -> Result<u16, DeliveryError> {
        let (status, body) = self
            .send_push(subscription, payload)
            .await
            .map_err(|e| DeliveryError::Failed(e.to_string()))?;

        if (200..300).contains(&status) {
            Ok(status)
        } else {
            Err(DeliveryError::Rejected { status, body })
        }
    }
}
