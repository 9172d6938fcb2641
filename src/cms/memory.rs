use std::{collections::HashMap, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{
    ContentClient, Filter, Ordering, QueryOptions, QueryResponse, RawDocument,
    models::link_resolver,
};
use crate::error::{Error, Result};

/// 未指定 `page_size` 时的默认页大小，与 Prismic 一致
const DEFAULT_PAGE_SIZE: u32 = 20;

/// fixtures 文件格式
#[derive(Debug, Clone, Default, Deserialize)]
struct Fixtures {
    #[serde(default)]
    documents: Vec<RawDocument>,
    /// 预览令牌 -> 该版本下的文档
    #[serde(default)]
    previews: HashMap<String, Vec<RawDocument>>,
}

/// 内存中的 CMS
///
/// 从 JSON fixtures 加载，用于离线开发和测试。
#[derive(Clone)]
pub struct MemoryClient {
    fixtures: Arc<Fixtures>,
    post_type: String,
}

/// 游标中保存的完整查询状态
#[derive(Serialize, Deserialize)]
struct MemoryCursor {
    filter: Filter,
    page_size: u32,
    page: u32,
    orderings: Option<Ordering>,
    after: Option<String>,
}

impl MemoryClient {
    pub fn new(post_type: impl Into<String>, documents: Vec<RawDocument>) -> Self {
        Self {
            fixtures: Arc::new(Fixtures {
                documents,
                previews: HashMap::new(),
            }),
            post_type: post_type.into(),
        }
    }

    /// 添加一个预览版本
    pub fn with_preview(mut self, token: impl Into<String>, documents: Vec<RawDocument>) -> Self {
        Arc::make_mut(&mut self.fixtures)
            .previews
            .insert(token.into(), documents);
        self
    }

    /// 从 JSON 文件加载
    ///
    /// ```json
    /// { "documents": [ ... ], "previews": { "token": [ ... ] } }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>, post_type: impl Into<String>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixtures: Fixtures = serde_json::from_str(&content)?;
        Ok(Self {
            fixtures: Arc::new(fixtures),
            post_type: post_type.into(),
        })
    }

    fn page(&self, cursor: MemoryCursor) -> Result<QueryResponse> {
        let mut docs: Vec<&RawDocument> = self
            .fixtures
            .documents
            .iter()
            .filter(|d| cursor.filter.matches(d))
            .collect();

        if let Some(ord) = &cursor.orderings {
            // 日期均为同一格式的 ISO 字符串，可直接按字典序比较
            docs.sort_by(|a, b| {
                let ord_result = sort_key(a, &ord.field).cmp(&sort_key(b, &ord.field));
                if ord.descending {
                    ord_result.reverse()
                } else {
                    ord_result
                }
            });
        }

        if let Some(after) = &cursor.after {
            docs = match docs.iter().position(|d| &d.id == after) {
                Some(pos) => docs.split_off(pos + 1),
                None => Vec::new(),
            };
        }

        let size = if cursor.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            cursor.page_size
        };
        let page = cursor.page.max(1);
        let total = u32::try_from(docs.len()).unwrap_or(u32::MAX);
        let total_pages = total.div_ceil(size);

        // 游标来自客户端，页码超出范围视为无效游标
        if page > total_pages.max(1) {
            return Err(Error::CursorRejected);
        }

        let results = docs
            .into_iter()
            .skip((page as usize - 1) * size as usize)
            .take(size as usize)
            .cloned()
            .collect();

        let encode = |page: u32| -> Result<String> {
            Ok(serde_json::to_string(&MemoryCursor {
                page,
                page_size: size,
                filter: cursor.filter.clone(),
                orderings: cursor.orderings.clone(),
                after: cursor.after.clone(),
            })?)
        };

        Ok(QueryResponse {
            page,
            results_per_page: size,
            total_results_size: total,
            total_pages,
            next_page: if page < total_pages {
                Some(encode(page + 1)?)
            } else {
                None
            },
            prev_page: if page > 1 { Some(encode(page - 1)?) } else { None },
            results,
        })
    }
}

fn sort_key<'a>(doc: &'a RawDocument, field: &str) -> Option<&'a str> {
    match field {
        Ordering::FIRST_PUBLICATION_DATE => doc.first_publication_date.as_deref(),
        Ordering::LAST_PUBLICATION_DATE => doc.last_publication_date.as_deref(),
        _ => None,
    }
}

impl ContentClient for MemoryClient {
    async fn query_page(&self, filter: &Filter, options: &QueryOptions) -> Result<QueryResponse> {
        let cursor = match &options.cursor {
            Some(token) => serde_json::from_str(token).map_err(|_| Error::CursorRejected)?,
            None => MemoryCursor {
                filter: filter.clone(),
                page_size: options.page_size,
                page: 1,
                orderings: options.orderings.clone(),
                after: options.after.clone(),
            },
        };
        self.page(cursor)
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<RawDocument>> {
        let filter = Filter::Uid {
            doc_type: doc_type.to_string(),
            uid: uid.to_string(),
        };

        let preview = reference
            .and_then(|r| self.fixtures.previews.get(r))
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)));

        Ok(preview
            .or_else(|| self.fixtures.documents.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn resolve_preview(&self, token: &str, document_id: &str) -> Result<Option<String>> {
        Ok(self
            .fixtures
            .previews
            .get(token)
            .and_then(|docs| docs.iter().find(|d| d.id == document_id))
            .map(|doc| link_resolver(doc, &self.post_type)))
    }
}
