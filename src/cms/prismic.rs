use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use super::{
    ContentClient, Filter, QueryOptions, QueryResponse, RawDocument, models::link_resolver,
};
use crate::error::{Error, Result};

/// Prismic REST API v2 客户端
///
/// 每次查询先获取 master ref，再访问 `documents/search`。
#[derive(Clone)]
pub struct PrismicClient {
    client: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    post_type: String,
}

#[derive(Deserialize)]
struct ApiInfo {
    refs: Vec<ApiRef>,
}

#[derive(Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

impl PrismicClient {
    /// 创建客户端
    ///
    /// ```ignore
    /// let client = PrismicClient::new("https://my-repo.cdn.prismic.io/api/v2", None, "posts", Duration::from_secs(10))?;
    /// ```
    pub fn new(
        endpoint: &str,
        access_token: Option<String>,
        post_type: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid cms endpoint `{endpoint}`: {e}")))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            access_token,
            post_type: post_type.into(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/documents/search", self.endpoint.as_str().trim_end_matches('/'))
    }

    /// 获取当前发布版本的 ref
    async fn master_ref(&self) -> Result<String> {
        let mut req = self.client.get(self.endpoint.clone());
        if let Some(token) = &self.access_token {
            req = req.query(&[("access_token", token)]);
        }

        let info: ApiInfo = req.send().await?.error_for_status()?.json().await?;

        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(Error::Config("cms api has no master ref".to_string()))
    }

    fn search_request(
        &self,
        reference: &str,
        filter: &Filter,
        options: &QueryOptions,
    ) -> reqwest::RequestBuilder {
        let mut params: Vec<(&str, String)> = vec![("ref", reference.to_string())];

        if *filter != Filter::All {
            params.push(("q", filter.predicate()));
        }

        if options.page_size > 0 {
            params.push(("pageSize", options.page_size.to_string()));
        }
        if let Some(ord) = &options.orderings {
            params.push(("orderings", ord.expression()));
        }
        if let Some(after) = &options.after {
            params.push(("after", after.clone()));
        }
        if let Some(token) = &self.access_token {
            params.push(("access_token", token.clone()));
        }

        self.client.get(self.search_url()).query(&params)
    }

    /// 校验并还原游标地址
    ///
    /// 游标就是 CMS 返回的 `next_page` 地址，只接受与 endpoint 同源的地址。
    fn cursor_url(&self, token: &str) -> Result<Url> {
        let mut url = Url::parse(token).map_err(|_| Error::CursorRejected)?;

        if url.origin() != self.endpoint.origin() {
            return Err(Error::CursorRejected);
        }

        if let Some(token) = &self.access_token {
            let has_token = url.query_pairs().any(|(k, _)| k == "access_token");
            if !has_token {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }

        Ok(url)
    }

    async fn search(
        &self,
        reference: &str,
        filter: &Filter,
        options: &QueryOptions,
    ) -> Result<QueryResponse> {
        let resp = self
            .search_request(reference, filter, options)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

impl ContentClient for PrismicClient {
    async fn query_page(&self, filter: &Filter, options: &QueryOptions) -> Result<QueryResponse> {
        if let Some(cursor) = &options.cursor {
            let url = self.cursor_url(cursor)?;
            let resp = self.client.get(url).send().await?.error_for_status()?;
            return Ok(resp.json().await?);
        }

        let reference = self.master_ref().await?;
        self.search(&reference, filter, options).await
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<RawDocument>> {
        let reference = match reference {
            Some(r) => r.to_string(),
            None => self.master_ref().await?,
        };

        let filter = Filter::Uid {
            doc_type: doc_type.to_string(),
            uid: uid.to_string(),
        };
        let resp = self
            .search(&reference, &filter, &QueryOptions::with_page_size(1))
            .await?;
        Ok(resp.results.into_iter().next())
    }

    async fn resolve_preview(&self, token: &str, document_id: &str) -> Result<Option<String>> {
        if token.is_empty() || document_id.is_empty() {
            return Ok(None);
        }

        let filter = Filter::DocumentId(document_id.to_string());
        match self
            .search(token, &filter, &QueryOptions::with_page_size(1))
            .await
        {
            Ok(resp) => Ok(resp
                .results
                .first()
                .map(|doc| link_resolver(doc, &self.post_type))),
            Err(e) => {
                tracing::warn!(%e, document_id, "preview resolve failed");
                Ok(None)
            }
        }
    }
}
