pub use self::{http::HTTP, web_push::WebPush};

mod http;
mod web_push;
