use axum::Router;
use axum::extract::State;
use axum::response::Redirect;
use axum::routing::get;
use axum_extra::extract::{
    CookieJar, Query,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;

use super::{ApiError, Result};

use crate::{cms::ContentClient, state::AppState};

/// 保存预览 ref 的 cookie 名
pub(super) const PREVIEW_COOKIE: &str = "zeroblog.preview-ref";

/// 配置预览相关路由。
///
/// - `GET /preview`：进入预览模式
/// - `GET /exit-preview`：退出预览模式
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/preview", get(preview))
        .route("/exit-preview", get(exit_preview))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewParams {
    token: String,
    #[serde(rename = "documentId")]
    document_id: String,
}

/// 进入预览模式。
///
/// 令牌有效时写入 cookie 并跳转到对应文章，否则返回 401。
async fn preview(
    Query(params): Query<PreviewParams>,
    State(app): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let redirect_url = app
        .cms()
        .resolve_preview(&params.token, &params.document_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let cookie = Cookie::build((PREVIEW_COOKIE, params.token))
        .path("/")
        .http_only(true)
        .secure(app.secure_cookie())
        .same_site(SameSite::Lax);

    tracing::info!(document_id = %params.document_id, "enter preview mode");
    Ok((jar.add(cookie), Redirect::temporary(&redirect_url)))
}

/// 退出预览模式，清除 cookie 并回到首页。
async fn exit_preview(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.remove(Cookie::build(PREVIEW_COOKIE).path("/")),
        Redirect::temporary("/"),
    )
}
