//! Browser front-end: an HTML chat page plus a small JSON API, both backed
//! by per-session state in the [`Container`](super::api::Container).

mod handlers;
mod page;
mod server;
mod session_cookie;

pub use page::{escape_html, render_page, Notice, PageView};
pub use server::{build_router, serve, spawn_session_sweeper};
pub use session_cookie::{session_cookie, session_id_from_headers, SESSION_COOKIE};
