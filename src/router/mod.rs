mod api;

pub use api::{app_router, ListParams, PostMessage};
