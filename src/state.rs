use std::sync::Arc;

use axum::extract::FromRef;

use crate::{cms::Cms, config::Settings, content::PostAggregator};

/// 应用程序上下文
///
/// [`AppState`] 封装了 CMS 客户端、文章聚合器和配置，提供统一访问入口。
#[derive(Clone, FromRef)]
pub struct AppState {
    cms: Cms,
    aggregator: Arc<PostAggregator>,
    settings: Arc<Settings>,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(cms: Cms, settings: Settings) -> Self {
        let aggregator = PostAggregator::new(settings.cms.document_type.clone())
            .with_ordering(settings.cms.adjacency_ordering.clone());

        Self {
            cms,
            aggregator: Arc::new(aggregator),
            settings: Arc::new(settings),
        }
    }

    /// 获取 CMS 客户端
    pub fn cms(&self) -> &Cms {
        &self.cms
    }

    /// 获取文章聚合器
    pub fn aggregator(&self) -> &PostAggregator {
        &self.aggregator
    }

    /// 列表页大小
    pub fn page_size(&self) -> u32 {
        self.settings.listing.page_size
    }

    /// 预览 cookie 是否只在 https 下发送
    pub fn secure_cookie(&self) -> bool {
        self.settings.server.secure_cookie
    }
}
