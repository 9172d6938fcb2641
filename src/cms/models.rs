use serde::{Deserialize, Serialize};

/// CMS 原始文档
///
/// 字段名与 Prismic REST API 保持一致，`data` 部分不做解释，交给 [`crate::content`] 归一化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// 分页查询结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    /// 下一页游标，`None` 表示没有更多页面
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    pub results: Vec<RawDocument>,
}

/// 查询过滤条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// 不过滤，返回所有文档
    All,
    /// 按文档类型过滤
    DocumentType(String),
    /// 按文档 id 过滤
    DocumentId(String),
    /// 按类型和 uid 精确匹配
    Uid { doc_type: String, uid: String },
}

impl Filter {
    /// 渲染为 Prismic 谓词表达式
    ///
    /// ```ignore
    /// assert_eq!(Filter::DocumentType("posts".into()).predicate(), r#"[[at(document.type, "posts")]]"#);
    /// ```
    pub fn predicate(&self) -> String {
        match self {
            Filter::All => "[]".to_string(),
            Filter::DocumentType(t) => format!("[[at(document.type, {})]]", quote(t)),
            Filter::DocumentId(id) => format!("[[at(document.id, {})]]", quote(id)),
            Filter::Uid { doc_type, uid } => {
                format!("[[at(my.{doc_type}.uid, {})]]", quote(uid))
            }
        }
    }

    pub fn matches(&self, doc: &RawDocument) -> bool {
        match self {
            Filter::All => true,
            Filter::DocumentType(t) => &doc.doc_type == t,
            Filter::DocumentId(id) => &doc.id == id,
            Filter::Uid { doc_type, uid } => {
                &doc.doc_type == doc_type && doc.uid.as_deref() == Some(uid.as_str())
            }
        }
    }
}

/// 谓词中的字符串字面量，转义 `\` 和 `"`
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// 排序条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub const LAST_PUBLICATION_DATE: &'static str = "document.last_publication_date";
    pub const FIRST_PUBLICATION_DATE: &'static str = "document.first_publication_date";

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// 反转排序方向
    pub fn reversed(&self) -> Self {
        Self {
            field: self.field.clone(),
            descending: !self.descending,
        }
    }

    /// 渲染为 `[field]` 或 `[field desc]`
    pub fn expression(&self) -> String {
        if self.descending {
            format!("[{} desc]", self.field)
        } else {
            format!("[{}]", self.field)
        }
    }
}

/// 分页查询参数
///
/// 如果给出 `cursor`，其余参数均以游标为准。
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub page_size: u32,
    pub cursor: Option<String>,
    pub orderings: Option<Ordering>,
    /// 只返回排在该文档之后的结果
    pub after: Option<String>,
}

impl QueryOptions {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    pub fn cursor(token: impl Into<String>) -> Self {
        Self {
            cursor: Some(token.into()),
            ..Default::default()
        }
    }
}

/// 预览链接解析
///
/// 文章类型的文档跳转到 `/post/{uid}`，其他文档回到首页。
pub fn link_resolver(doc: &RawDocument, post_type: &str) -> String {
    match (&doc.uid, doc.doc_type == post_type) {
        (Some(uid), true) => format!("/post/{uid}"),
        _ => "/".to_string(),
    }
}
