use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::str::FromStr;
use std::time::Duration;

use crate::{
    configuration::Config,
    error::{self, Error},
    types::PushHeader,
};

const USER_AGENT: &str = "push-server";

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let http = match Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                return Err(error::Error::ReqwestError(e));
            },
        };

        Ok(HTTP { config, http })
    }

    /// POST an encrypted push message. Returns the push service status and
    /// response body; non-2xx statuses are not treated as errors here.
    pub async fn post_push(
        &self,
        url: &str,
        signature: String,
        push_header: &PushHeader,
        data: Vec<u8>,
    ) -> Result<(u16, String), Error> {
        let mut header_map = HeaderMap::new();
        let bearer = format!("WebPush {}", &signature);

        header_map.insert(
            HeaderName::from_str("User-Agent")?,
            HeaderValue::from_str(USER_AGENT)?,
        );

        header_map.insert(
            HeaderName::from_str("authorization")?,
            HeaderValue::from_str(bearer.as_str())?,
        );
        header_map.insert(
            HeaderName::from_str("content-encoding")?,
            HeaderValue::from_str("aes128gcm")?,
        );
        header_map.insert(
            HeaderName::from_str("content-type")?,
            HeaderValue::from_str("application/octet-stream")?,
        );
        header_map.insert(
            HeaderName::from_str("ttl")?,
            HeaderValue::from_str(&push_header.ttl.to_string())?,
        );

        header_map.insert(
            HeaderName::from_str("urgency")?,
            HeaderValue::from_str(&push_header.urgency.to_string())?,
        );

        let crypto_key_value =
            format!("p256ecdsa={}", self.config.vapid_public_key.trim());
        header_map.insert(
            HeaderName::from_static("crypto-key"),
            HeaderValue::from_str(&crypto_key_value)?,
        );
        let response = self
            .http
            .post(url)
            .headers(header_map)
            .body(data)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok((status, body))
    }
}
