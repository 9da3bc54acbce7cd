pub use self::{
    push::{Claims, NotificationEnvelope, PushHeader, Urgency},
    subscription::{Subscription, SubscriptionKeys, SubscriptionRequest},
};

mod push;
mod subscription;
