use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::{CookieJar, Query};
use serde::Deserialize;

use super::{Result, preview::PREVIEW_COOKIE};

use crate::{
    content::{PostPage, PostView},
    state::AppState,
};

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /posts`：文章列表，`?cursor=` 加载下一页
/// - `GET /posts/{uid}`：文章详情
/// - `GET /paths`：所有文章的静态路径
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/posts", get(post_list))
        .route("/posts/{uid}", get(post))
        .route("/paths", get(path_list))
}

/// 列表查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    cursor: Option<String>,
}

/// 获取文章列表。
///
/// 没有游标时返回第一页，否则返回游标指向的页面。
async fn post_list(
    Query(params): Query<ListParams>,
    State(app): State<AppState>,
) -> Result<Json<PostPage>> {
    let aggregator = app.aggregator();
    let page = match params.cursor.as_deref() {
        Some(cursor) => aggregator.next_page(app.cms(), cursor).await?,
        None => aggregator.first_page(app.cms(), app.page_size()).await?,
    };
    Ok(Json(page))
}

/// 根据 uid 获取文章详情。
///
/// 带有预览 cookie 时读取预览版本，文章不存在返回 [`crate::error::Error::NotFound`]。
async fn post(
    Path(uid): Path<String>,
    State(app): State<AppState>,
    jar: CookieJar,
) -> Result<Json<PostView>> {
    let preview_ref = jar.get(PREVIEW_COOKIE).map(|c| c.value().to_string());

    app.aggregator()
        .post(app.cms(), &uid, preview_ref.as_deref())
        .await
        .map(Json)
}

/// 获取所有文章的静态路径。
async fn path_list(State(app): State<AppState>) -> Result<Json<Vec<String>>> {
    app.aggregator()
        .list_paths(app.cms(), app.page_size())
        .await
        .map(Json)
}
