use crate::error::Result;

use super::{Filter, MemoryClient, PrismicClient, QueryOptions, QueryResponse, RawDocument};

/// 访问 CMS 的接口
///
/// 提供分页查询、按 uid 获取文档和预览解析。
pub trait ContentClient: Send + Sync {
    /// 分页查询文档
    ///
    /// 返回 [`QueryResponse`]，其中 `next_page` 为下一页的不透明游标。
    fn query_page(
        &self,
        filter: &Filter,
        options: &QueryOptions,
    ) -> impl std::future::Future<Output = Result<QueryResponse>> + Send;

    /// 按 uid 获取单个文档
    ///
    /// `reference` 指定内容版本（预览模式），不存在时返回 `None`。
    fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Option<RawDocument>>> + Send;

    /// 解析预览跳转地址
    ///
    /// 令牌或文档无效时返回 `None`。
    fn resolve_preview(
        &self,
        token: &str,
        document_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}

/// 根据配置选择的 CMS 后端
#[derive(Clone)]
pub enum Cms {
    Prismic(PrismicClient),
    Memory(MemoryClient),
}

impl ContentClient for Cms {
    async fn query_page(&self, filter: &Filter, options: &QueryOptions) -> Result<QueryResponse> {
        match self {
            Cms::Prismic(c) => c.query_page(filter, options).await,
            Cms::Memory(c) => c.query_page(filter, options).await,
        }
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<RawDocument>> {
        match self {
            Cms::Prismic(c) => c.get_by_uid(doc_type, uid, reference).await,
            Cms::Memory(c) => c.get_by_uid(doc_type, uid, reference).await,
        }
    }

    async fn resolve_preview(&self, token: &str, document_id: &str) -> Result<Option<String>> {
        match self {
            Cms::Prismic(c) => c.resolve_preview(token, document_id).await,
            Cms::Memory(c) => c.resolve_preview(token, document_id).await,
        }
    }
}
