use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode, header},
};

use serde_json::json;
use tower::util::ServiceExt;
use zeroblog::{
    api,
    cms::{Cms, MemoryClient, RawDocument},
    config::Settings,
    state,
};

struct TestApp {
    router: Router,
}

fn post(id: &str, uid: &str, date: &str, title: &str) -> RawDocument {
    serde_json::from_value(json!({
        "id": id,
        "uid": uid,
        "type": "posts",
        "first_publication_date": date,
        "last_publication_date": date,
        "data": {
            "title": title,
            "subtitle": "Pensando em sincronização em vez de ciclos de vida",
            "author": "Joseph Oliveira",
            "banner": { "url": "https://images.prismic.io/banner.png" },
            "content": [
                {
                    "heading": "Proin et varius",
                    "body": [ { "type": "paragraph", "text": "Lorem ipsum dolor sit amet", "spans": [] } ]
                }
            ]
        }
    }))
    .expect("构造文档失败")
}

impl TestApp {
    fn new() -> Self {
        let documents = vec![
            post("A", "como-utilizar-hooks", "2021-03-15T19:25:28+0000", "Como utilizar Hooks"),
            post("B", "criando-um-app-cra-do-zero", "2021-03-20T19:25:28+0000", "Criando um app CRA do zero"),
            post("C", "mapas-com-react", "2021-03-25T19:25:28+0000", "Mapas com React"),
        ];
        let draft = post("B", "criando-um-app-cra-do-zero", "2021-03-20T19:25:28+0000", "Rascunho");

        let client = MemoryClient::new("posts", documents).with_preview("preview-token", vec![draft]);
        let app = state::AppState::new(Cms::Memory(client), Settings::default());

        Self {
            router: api::setup_route(app),
        }
    }

    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot fail")
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::get(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.request(req.body(Body::empty()).expect("请求失败")).await
    }

    async fn get_json(&self, uri: &str, cookie: Option<&str>, msg: &str) -> serde_json::Value {
        let resp = self.get(uri, cookie).await;
        assert_eq!(StatusCode::OK, resp.status(), "{}", msg);
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        serde_json::from_slice(&data).expect("反序列化失败")
    }
}

fn uids(page: &serde_json::Value) -> Vec<&str> {
    page["posts"]
        .as_array()
        .expect("posts 应为数组")
        .iter()
        .map(|p| p["uid"].as_str().expect("uid 应为字符串"))
        .collect()
}

#[tokio::test]
async fn test_post_list_and_load_more() {
    let app = TestApp::new();

    let first = app.get_json("/api/posts", None, "第一页").await;
    assert_eq!(uids(&first), vec!["como-utilizar-hooks", "criando-um-app-cra-do-zero"]);
    assert_eq!(first["page"], 1);
    assert_eq!(first["posts"][0]["display_date"], "15 mar 2021");

    let cursor = first["next_page"].as_str().expect("应有下一页");
    let uri = format!(
        "/api/posts?cursor={}",
        cursor
            .bytes()
            .map(|b| format!("%{:02X}", b))
            .collect::<String>()
    );
    let second = app.get_json(&uri, None, "第二页").await;
    assert_eq!(uids(&second), vec!["mapas-com-react"]);
    assert_eq!(second["page"], 2);
    assert!(second["next_page"].is_null());
}

#[tokio::test]
async fn test_bad_cursor() {
    let app = TestApp::new();
    let resp = app.get("/api/posts?cursor=garbage", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // {"filter":"All","page_size":2,"page":4294967295,"orderings":null,"after":null}
    let resp = app
        .get(
            "/api/posts?cursor=%7B%22filter%22%3A%22All%22%2C%22page_size%22%3A2%2C%22page%22%3A4294967295%2C%22orderings%22%3Anull%2C%22after%22%3Anull%7D",
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "页码溢出的游标");
}

#[tokio::test]
async fn test_uid_with_quotes_is_not_found() {
    let app = TestApp::new();
    let resp = app.get("/api/posts/a%22b", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_detail() {
    let app = TestApp::new();

    let view = app
        .get_json("/api/posts/criando-um-app-cra-do-zero", None, "获取文章")
        .await;
    assert_eq!(view["post"]["title"], "Criando um app CRA do zero");
    assert_eq!(view["post"]["banner_url"], "https://images.prismic.io/banner.png");
    assert_eq!(view["reading_time"], 1);
    assert_eq!(view["preview"], false);
    assert_eq!(view["navigation"]["previous"]["slug"], "como-utilizar-hooks");
    assert_eq!(view["navigation"]["next"]["slug"], "mapas-com-react");

    let first = app
        .get_json("/api/posts/como-utilizar-hooks", None, "第一篇文章")
        .await;
    assert!(first["navigation"]["previous"].is_null());

    let resp = app.get("/api/posts/nao-existe", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "不存在的文章");
}

#[tokio::test]
async fn test_paths() {
    let app = TestApp::new();
    let paths = app.get_json("/api/paths", None, "静态路径").await;
    assert_eq!(
        paths,
        json!([
            "/post/como-utilizar-hooks",
            "/post/criando-um-app-cra-do-zero",
            "/post/mapas-com-react"
        ])
    );
}

#[tokio::test]
async fn test_preview_flow() {
    let app = TestApp::new();

    let resp = app.get("/api/preview?token=bad&documentId=B", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "无效令牌");
    let data = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("读取数据失败");
    let body: serde_json::Value = serde_json::from_slice(&data).expect("反序列化失败");
    assert_eq!(body, json!({ "message": "Invalid token" }));

    let resp = app.get("/api/preview", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "缺少参数");

    let resp = app
        .get("/api/preview?token=preview-token&documentId=B", None)
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers()[header::LOCATION],
        "/post/criando-um-app-cra-do-zero"
    );
    let cookie = resp.headers()[header::SET_COOKIE]
        .to_str()
        .expect("cookie 应为字符串");
    assert!(cookie.starts_with("zeroblog.preview-ref=preview-token"));
    assert!(cookie.contains("HttpOnly"), "cookie 应为 HttpOnly");
    assert!(cookie.contains("Secure"), "默认只在 https 下发送 cookie");

    let view = app
        .get_json(
            "/api/posts/criando-um-app-cra-do-zero",
            Some("zeroblog.preview-ref=preview-token"),
            "预览文章",
        )
        .await;
    assert_eq!(view["post"]["title"], "Rascunho");
    assert_eq!(view["preview"], true);

    let resp = app
        .get("/api/exit-preview", Some("zeroblog.preview-ref=preview-token"))
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[header::LOCATION], "/");
    assert!(resp.headers().contains_key(header::SET_COOKIE));
}
