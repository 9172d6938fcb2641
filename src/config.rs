use std::{env, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::{
    cms::{Cms, MemoryClient, Ordering, PrismicClient},
    error::{Error, Result},
};

/// 默认配置文件路径，可通过 `ZEROBLOG_CONFIG` 覆盖
const DEFAULT_CONFIG_FILE: &str = "zeroblog.toml";

/// 应用配置
///
/// 先读取 toml 文件（可选），再由环境变量覆盖。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cms: CmsSettings,
    pub listing: ListingSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CmsSettings {
    /// Prismic API 地址，如 `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    /// 文章的文档类型
    pub document_type: String,
    /// 离线 fixtures 文件，设置后不访问远程 CMS
    pub fixtures: Option<PathBuf>,
    pub timeout_secs: u64,
    /// 上一篇/下一篇所依据的排序字段
    pub adjacency_ordering: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: String,
    /// 预览 cookie 是否带 `Secure` 属性
    pub secure_cookie: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cms: CmsSettings::default(),
            listing: ListingSettings { page_size: 2 },
            server: ServerSettings {
                listen: "0.0.0.0:3000".to_string(),
                secure_cookie: true,
            },
        }
    }
}

impl Default for CmsSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_token: None,
            document_type: "posts".to_string(),
            fixtures: None,
            timeout_secs: 10,
            adjacency_ordering: Ordering::LAST_PUBLICATION_DATE.to_string(),
        }
    }
}

impl Default for ListingSettings {
    fn default() -> Self {
        Settings::default().listing
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Settings::default().server
    }
}

impl Settings {
    /// 从 toml 文件解析配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 读取配置文件（不存在时使用默认值），并应用环境变量
    pub fn from_env() -> Result<Self> {
        let path = env::var("ZEROBLOG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut settings = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        settings.apply_overrides(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// 应用环境变量覆盖
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = var("CMS_API_ENDPOINT") {
            self.cms.endpoint = Some(v);
        }
        if let Some(v) = var("CMS_ACCESS_TOKEN") {
            self.cms.access_token = Some(v);
        }
        if let Some(v) = var("CMS_DOCUMENT_TYPE") {
            self.cms.document_type = v;
        }
        if let Some(v) = var("CMS_FIXTURES") {
            self.cms.fixtures = Some(PathBuf::from(v));
        }
        if let Some(v) = var("CMS_ADJACENCY_ORDERING") {
            self.cms.adjacency_ordering = match v.as_str() {
                "first_publication_date" | Ordering::FIRST_PUBLICATION_DATE => {
                    Ordering::FIRST_PUBLICATION_DATE.to_string()
                }
                "last_publication_date" | Ordering::LAST_PUBLICATION_DATE => {
                    Ordering::LAST_PUBLICATION_DATE.to_string()
                }
                _ => {
                    return Err(Error::Config(format!(
                        "invalid CMS_ADJACENCY_ORDERING `{v}`"
                    )));
                }
            };
        }
        if let Some(v) = var("BLOG_PAGE_SIZE") {
            self.listing.page_size = v
                .parse()
                .map_err(|_| Error::Config(format!("invalid BLOG_PAGE_SIZE `{v}`")))?;
        }
        if let Some(v) = var("BLOG_LISTEN") {
            self.server.listen = v;
        }
        if let Some(v) = var("BLOG_SECURE_COOKIE") {
            self.server.secure_cookie = v
                .parse()
                .map_err(|_| Error::Config(format!("invalid BLOG_SECURE_COOKIE `{v}`")))?;
        }
        Ok(())
    }

    /// 根据配置创建 CMS 客户端
    ///
    /// 设置了 fixtures 时优先使用 [`MemoryClient`]。
    pub fn cms_client(&self) -> Result<Cms> {
        let cms = &self.cms;
        match (&cms.fixtures, &cms.endpoint) {
            (Some(path), _) => Ok(Cms::Memory(MemoryClient::from_json_file(
                path,
                cms.document_type.clone(),
            )?)),
            (None, Some(endpoint)) => Ok(Cms::Prismic(PrismicClient::new(
                endpoint,
                cms.access_token.clone(),
                cms.document_type.clone(),
                Duration::from_secs(cms.timeout_secs),
            )?)),
            (None, None) => Err(Error::Config(
                "either CMS_API_ENDPOINT or CMS_FIXTURES must be set".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.listing.page_size, 2);
        assert_eq!(settings.server.listen, "0.0.0.0:3000");
        assert_eq!(settings.cms.document_type, "posts");
        assert_eq!(settings.cms.adjacency_ordering, Ordering::LAST_PUBLICATION_DATE);
        assert!(settings.server.secure_cookie);
        assert!(matches!(settings.cms_client(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("zeroblog.toml");
        std::fs::write(
            &path,
            r#"
            [cms]
            endpoint = "https://blog.cdn.prismic.io/api/v2"
            document_type = "pos"

            [listing]
            page_size = 5
            "#,
        )
        .expect("写入失败");

        let settings = Settings::from_file(&path).expect("解析失败");
        assert_eq!(settings.cms.document_type, "pos");
        assert_eq!(settings.cms.timeout_secs, 10, "未设置的字段应使用默认值");
        assert_eq!(settings.listing.page_size, 5);
        assert_eq!(settings.server.listen, "0.0.0.0:3000");
        assert!(matches!(settings.cms_client(), Ok(Cms::Prismic(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CMS_FIXTURES", "fixtures.json"),
            ("BLOG_PAGE_SIZE", "3"),
            ("BLOG_LISTEN", "127.0.0.1:8080"),
            ("CMS_ADJACENCY_ORDERING", "first_publication_date"),
            ("BLOG_SECURE_COOKIE", "false"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .expect("覆盖失败");
        assert_eq!(settings.cms.fixtures, Some(PathBuf::from("fixtures.json")));
        assert_eq!(settings.listing.page_size, 3);
        assert_eq!(settings.server.listen, "127.0.0.1:8080");
        assert_eq!(settings.cms.adjacency_ordering, Ordering::FIRST_PUBLICATION_DATE);
        assert!(!settings.server.secure_cookie);

        let result = settings
            .apply_overrides(|k| (k == "CMS_ADJACENCY_ORDERING").then(|| "title".into()));
        assert!(matches!(result, Err(Error::Config(_))));

        let result = settings.apply_overrides(|k| (k == "BLOG_PAGE_SIZE").then(|| "dois".into()));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
