pub mod broadcast;
pub mod health;
pub mod send_notification;
pub mod subscribe;
pub mod subscriptions;
pub mod unsubscribe;
pub mod vapid_public_key;
pub mod version;
