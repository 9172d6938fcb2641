use std::io;

use axum::{Json, http::StatusCode, response::IntoResponse};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid token")]
    Unauthorized,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 文档不存在（区别于"仍在生成中"）
    #[error("Not Found")]
    NotFound,

    /// CMS 返回的记录缺少必需字段
    #[error("malformed record `{id}`: missing or invalid `{field}`")]
    MalformedRecord { field: &'static str, id: String },

    /// 分页游标指向了非 CMS 来源的地址
    #[error("cursor rejected")]
    CursorRejected,

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
            Error::ApiError(api_error) => match api_error {
                ApiError::Unauthorized => (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "message": api_error.to_string() })),
                )
                    .into_response(),
            },
            Error::CursorRejected => (StatusCode::BAD_REQUEST, "Bad Cursor").into_response(),
            Error::MalformedRecord { .. } => {
                tracing::error!(e = %self, "cms record error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Error::Reqwest(e) => {
                tracing::error!(%e, "cms request error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Error::Json(e) => {
                tracing::error!(%e, "json error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Error::Config(_) | Error::Toml(_) | Error::Io(_) => {
                tracing::error!(e = %self, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
