use crate::{
    cms::{ContentClient, Filter, Ordering, QueryOptions, QueryResponse, RawDocument},
    error::{Error, Result},
    pagination::{LoadOutcome, PaginationCursor},
};

use super::{
    NavLink, NavigationLinks, PostDetail, PostPage, PostSummary, PostView, Section,
    compute_reading_time, date,
};

/// 文章聚合器
///
/// 将 CMS 原始文档归一化为展示模型，并负责相邻文章和静态路径的解析。
#[derive(Debug, Clone)]
pub struct PostAggregator {
    post_type: String,
    /// 相邻文章使用的排序字段（升序）
    ordering: Ordering,
}

fn malformed(field: &'static str, raw: &RawDocument) -> Error {
    Error::MalformedRecord {
        field,
        id: raw.id.clone(),
    }
}

fn str_field<'a>(data: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(|v| v.as_str())
}

impl PostAggregator {
    pub fn new(post_type: impl Into<String>) -> Self {
        Self {
            post_type: post_type.into(),
            ordering: Ordering::asc(Ordering::LAST_PUBLICATION_DATE),
        }
    }

    /// 指定相邻文章的排序字段
    pub fn with_ordering(mut self, field: impl Into<String>) -> Self {
        self.ordering = Ordering::asc(field);
        self
    }

    pub fn post_type(&self) -> &str {
        &self.post_type
    }

    fn filter(&self) -> Filter {
        Filter::DocumentType(self.post_type.clone())
    }

    /// 归一化为 [`PostSummary`]
    ///
    /// 缺少 `uid` 或 `title` 时返回 [`Error::MalformedRecord`]。
    pub fn normalize_summary(&self, raw: &RawDocument) -> Result<PostSummary> {
        let uid = raw
            .uid
            .as_deref()
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| malformed("uid", raw))?;
        let title = str_field(&raw.data, "title").ok_or_else(|| malformed("title", raw))?;

        let publication_date = match &raw.first_publication_date {
            Some(s) => Some(
                date::parse_publication_date(s)
                    .ok_or_else(|| malformed("first_publication_date", raw))?,
            ),
            None => None,
        };

        Ok(PostSummary {
            uid: uid.to_string(),
            display_date: publication_date.as_ref().map(date::display_date),
            publication_date,
            title: title.to_string(),
            subtitle: str_field(&raw.data, "subtitle").unwrap_or_default().to_string(),
            author: str_field(&raw.data, "author").unwrap_or_default().to_string(),
        })
    }

    /// 归一化为 [`PostDetail`]，正文结构原样保留
    pub fn normalize_detail(&self, raw: &RawDocument) -> Result<PostDetail> {
        let summary = self.normalize_summary(raw)?;

        let banner_url = raw
            .data
            .pointer("/banner/url")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let content = match raw.data.get("content") {
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(v) => serde_json::from_value::<Vec<Section>>(v.clone())
                .map_err(|_| malformed("content", raw))?,
        };

        Ok(PostDetail {
            summary,
            id: raw.id.clone(),
            banner_url,
            content,
        })
    }

    /// 归一化一页结果
    ///
    /// 格式错误的文档会被丢弃，不影响整页。
    pub fn normalize_page(&self, resp: QueryResponse) -> PostPage {
        let posts = resp
            .results
            .iter()
            .filter_map(|raw| match self.normalize_summary(raw) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!(%e, "drop malformed post");
                    None
                }
            })
            .collect();

        PostPage {
            posts,
            next_page: resp.next_page,
            page: resp.page,
        }
    }

    /// 获取第一页文章
    pub async fn first_page<C: ContentClient>(&self, client: &C, page_size: u32) -> Result<PostPage> {
        let resp = client
            .query_page(&self.filter(), &QueryOptions::with_page_size(page_size))
            .await?;
        Ok(self.normalize_page(resp))
    }

    /// 根据游标获取下一页文章
    pub async fn next_page<C: ContentClient>(&self, client: &C, token: &str) -> Result<PostPage> {
        let resp = client
            .query_page(&self.filter(), &QueryOptions::cursor(token))
            .await?;
        Ok(self.normalize_page(resp))
    }

    /// 解析相邻文章
    ///
    /// 以当前文档为起点，分别按排序字段的降序和升序各取一篇，作为上一篇和下一篇。
    /// 多篇文档排序值相同时结果只是近似的。
    pub async fn resolve_adjacent<C: ContentClient>(
        &self,
        client: &C,
        current_id: &str,
    ) -> Result<NavigationLinks> {
        let filter = self.filter();
        let neighbour = |ordering: Ordering| QueryOptions {
            page_size: 1,
            cursor: None,
            orderings: Some(ordering),
            after: Some(current_id.to_string()),
        };
        let before = neighbour(self.ordering.reversed());
        let after = neighbour(self.ordering.clone());

        let (previous, next) = tokio::try_join!(
            client.query_page(&filter, &before),
            client.query_page(&filter, &after)
        )?;

        Ok(NavigationLinks {
            previous: self.nav_link(previous),
            next: self.nav_link(next),
        })
    }

    fn nav_link(&self, resp: QueryResponse) -> Option<NavLink> {
        let raw = resp.results.first()?;
        match self.normalize_summary(raw) {
            Ok(post) => Some(NavLink {
                slug: post.uid,
                title: post.title,
            }),
            Err(e) => {
                tracing::warn!(%e, "drop malformed neighbour");
                None
            }
        }
    }

    /// 获取文章详情页数据
    ///
    /// `preview_ref` 不为空时读取对应的预览版本，文章不存在返回 [`Error::NotFound`]。
    pub async fn post<C: ContentClient>(
        &self,
        client: &C,
        uid: &str,
        preview_ref: Option<&str>,
    ) -> Result<PostView> {
        let raw = client
            .get_by_uid(&self.post_type, uid, preview_ref)
            .await?
            .ok_or(Error::NotFound)?;

        let post = self.normalize_detail(&raw)?;
        let navigation = self.resolve_adjacent(client, &post.id).await?;

        Ok(PostView {
            reading_time: compute_reading_time(&post.content),
            post,
            navigation,
            preview: preview_ref.is_some(),
        })
    }

    /// 列出所有文章的静态路径
    ///
    /// 逐页加载直到没有更多页面。
    pub async fn list_paths<C: ContentClient>(
        &self,
        client: &C,
        page_size: u32,
    ) -> Result<Vec<String>> {
        let mut cursor = PaginationCursor::initial(self.first_page(client, page_size).await?);

        while let LoadOutcome::Loaded(_) = cursor.load_more(client, self).await? {}

        Ok(cursor
            .loaded_posts()
            .iter()
            .map(|p| format!("/post/{}", p.uid))
            .collect())
    }
}
