mod http;

pub use self::http::{response_body, FetchResult, HttpError, ValidatedUrl, MAX_RESPONSE_BODY_SIZE};

// Crux's built-in Render capability covers view updates; the only other
// effect the core needs is the one-shot dataset fetch.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppRender = Render<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
