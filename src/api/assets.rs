use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets"]
struct Asset;

pub fn page(name: &str) -> Response {
    match Asset::get(name) {
        Some(content) => {
            let mime = mime_guess::from_path(name).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                Body::from(content.data),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// The login form, optionally re-rendered with an error line.
pub fn login_page(error: Option<&str>) -> Html<String> {
    let raw = Asset::get("admin_login.html")
        .map(|content| String::from_utf8_lossy(&content.data).into_owned())
        .unwrap_or_default();

    let rendered = match error {
        Some(message) => raw.replace(
            "<!-- error -->",
            &format!(r#"<p class="error">{message}</p>"#),
        ),
        None => raw,
    };

    Html(rendered)
}
