//! Push dispatch
//!
//! Payload classification, the delivery capability seam, concurrent
//! dispatch and pruning of subscriptions the push service reports as gone.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Subscription;

pub use self::{
    dispatcher::{BroadcastSummary, DispatchResult, Dispatcher, Outcome},
    payload::{EnvelopeDefaults, Payload},
};

pub mod dispatcher;
pub mod payload;
pub mod reconciler;

/// Wire-level push exchange with a vendor push service: encrypt `payload`
/// for `subscription`, sign the request and POST it to the endpoint.
///
/// Returns the push service status code on a 2xx response.
#[async_trait]
pub trait PushDelivery: fmt::Debug + Send + Sync {
    async fn deliver(
        &self,
        subscription: &Subscription,
        payload: &[u8],
    ) -> Result<u16, DeliveryError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Push service responded with {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Push delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("Push delivery failed: {0}")]
    Failed(String),
}

impl DeliveryError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DeliveryError::Rejected { status, .. } => Some(*status),
            DeliveryError::Timeout(_) | DeliveryError::Failed(_) => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing;
