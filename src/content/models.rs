use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 文章摘要，用于列表展示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub uid: String,
    pub publication_date: Option<DateTime<FixedOffset>>,
    /// `dd MMM yyyy` 格式的发布日期，参见 [`super::display_date`]
    pub display_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// 文章中的一节
///
/// `body` 为 CMS 的富文本结构，原样交给渲染层。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: String,
    #[serde(default = "empty_body")]
    pub body: serde_json::Value,
}

fn empty_body() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

/// 完整文章
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,
    /// CMS 文档 id，用于查询相邻文章
    pub id: String,
    pub banner_url: String,
    pub content: Vec<Section>,
}

/// 一页文章
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub posts: Vec<PostSummary>,
    /// 下一页游标，`None` 表示没有更多页面
    pub next_page: Option<String>,
    pub page: u32,
}

/// 相邻文章链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationLinks {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// 文章详情页所需的全部数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub post: PostDetail,
    /// 预计阅读时间（分钟）
    pub reading_time: u32,
    pub navigation: NavigationLinks,
    /// 是否为预览版本
    pub preview: bool,
}
