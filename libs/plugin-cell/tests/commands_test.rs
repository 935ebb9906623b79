use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plugin_cell::{CommandRegistry, Dispatcher, EXIT_OK};
use shared_utils::test_utils::TestEnv;

const INSTANCE_PATH: &str = "/services/hcaas/proxy/mysite";

async fn run_plugin(server: &MockServer, args: &[&str]) -> (i32, String, String) {
    let env = TestEnv::platform(&server.uri());
    let dispatcher = Dispatcher::new(CommandRegistry::new(), env.lookup());
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = dispatcher.run(&args, &mut out, &mut err).await;

    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[tokio::test]
async fn test_add_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/url"))
        .and(header("Authorization", "bearer abc123"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "text/plain"))
        .and(body_json(json!({"url": "http://mysite.com/hc"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, err) = run_plugin(&server, &["add-url", "hcaas", "mysite", "http://mysite.com/hc"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "url http://mysite.com/hc successfully added!\n");
    assert!(err.is_empty());
}

#[tokio::test]
async fn test_add_url_with_expected_string_and_comment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSTANCE_PATH))
        .and(body_json(json!({
            "url": "http://mysite.com/hc",
            "expected_string": "WORKING",
            "comment": "restart the app"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(
        &server,
        &["add-url", "hcaas", "mysite", "http://mysite.com/hc", "WORKING", "restart the app"],
    )
    .await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "url http://mysite.com/hc successfully added!\n");
}

#[tokio::test]
async fn test_add_url_with_comment_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSTANCE_PATH))
        .and(body_json(json!({"url": "http://mysite.com/hc", "comment": "call ops"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (code, _, _) = run_plugin(
        &server,
        &["add-url", "hcaas", "mysite", "http://mysite.com/hc", "", "call ops"],
    )
    .await;

    assert_eq!(code, EXIT_OK);
}

#[tokio::test]
async fn test_add_url_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["add-url", "hcaas", "mysite", "http://mysite.com/hc"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "error: Internal Server Error.\n");
}

#[tokio::test]
async fn test_remove_url() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/url"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"url": "http://mysite.com/hc"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["remove-url", "hcaas", "mysite", "http://mysite.com/hc"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "url http://mysite.com/hc successfully removed!\n");
}

#[tokio::test]
async fn test_remove_url_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["remove-url", "hcaas", "mysite", "http://mysite.com/hc"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "URL http://mysite.com/hc not found.\n");
}

#[tokio::test]
async fn test_remove_url_other_error_is_generic() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["remove-url", "hcaas", "mysite", "http://mysite.com/hc"]).await;

    assert_eq!(out, "error: Bad Gateway.\n");
}

#[tokio::test]
async fn test_list_urls_prints_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/url"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"["http://a/hc","http://b/hc"]"#))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["list-urls", "hcaas", "mysite"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "[\"http://a/hc\",\"http://b/hc\"]\n");
}

#[tokio::test]
async fn test_add_watcher() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/watcher"))
        .and(header("Accept", "text/plain"))
        .and(body_json(json!({"watcher": "ops@mycompany.com"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["add-watcher", "hcaas", "mysite", "ops@mycompany.com"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "watcher ops@mycompany.com successfully added!\n");
}

#[tokio::test]
async fn test_add_watcher_with_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({"watcher": "ops@mycompany.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(
        &server,
        &["add-watcher", "hcaas", "mysite", "ops@mycompany.com", "secret"],
    )
    .await;

    assert_eq!(out, "watcher ops@mycompany.com successfully added!\n");
}

#[tokio::test]
async fn test_remove_watcher() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/watcher/ops@mycompany.com"))
        .and(header("Authorization", "bearer abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["remove-watcher", "hcaas", "mysite", "ops@mycompany.com"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "watcher ops@mycompany.com successfully removed!\n");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("content-type").is_none());
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_watcher_email_with_plus_reaches_callback_intact() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/watcher/mysite+monit@mycompany.com"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(
        &server,
        &["remove-watcher", "hcaas", "mysite", "mysite+monit@mycompany.com"],
    )
    .await;

    assert_eq!(out, "watcher mysite+monit@mycompany.com successfully removed!\n");
}

#[tokio::test]
async fn test_keyword_is_encoded_inside_callback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/servicegroups?keyword=a%26b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["list-service-groups", "hcaas", "mysite", "a&b"]).await;

    assert_eq!(code, EXIT_OK);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_remove_watcher_not_found_is_generic() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["remove-watcher", "hcaas", "mysite", "ops@mycompany.com"]).await;

    assert_eq!(out, "error: Not Found.\n");
}

#[tokio::test]
async fn test_list_watchers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/watcher"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["a@x.com", "b@x.com"])))
        .expect(1)
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["list-watchers", "hcaas", "mysite"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "a@x.com\nb@x.com\n");
}

#[tokio::test]
async fn test_list_watchers_unexpected_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["list-watchers", "hcaas", "mysite"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "error: unexpected response from the service.\n");
}

#[tokio::test]
async fn test_list_service_groups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/servicegroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["infra", "projects"])))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["list-service-groups", "hcaas", "mysite"]).await;

    assert_eq!(out, "infra\nprojects\n");
}

#[tokio::test]
async fn test_list_service_groups_with_keyword() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/servicegroups?keyword=proj"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["projects"])))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["list-service-groups", "hcaas", "mysite", "proj"]).await;

    assert_eq!(out, "projects\n");
}

#[tokio::test]
async fn test_add_group() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/groups"))
        .and(header("Accept", "text/plain"))
        .and(body_json(json!({"group": "infra"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["add-group", "hcaas", "mysite", "infra"]).await;

    assert_eq!(out, "group infra successfully added!\n");
}

#[tokio::test]
async fn test_remove_group() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/groups"))
        .and(body_json(json!({"group": "infra"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["remove-group", "hcaas", "mysite", "infra"]).await;

    assert_eq!(out, "group infra successfully removed!\n");
}

#[tokio::test]
async fn test_remove_group_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (code, out, _) = run_plugin(&server, &["remove-group", "hcaas", "mysite", "infra"]).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "group not found in the instance.\n");
}

#[tokio::test]
async fn test_list_groups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCE_PATH))
        .and(query_param("callback", "/resources/mysite/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["projects", "infra"])))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["list-groups", "hcaas", "mysite"]).await;

    assert_eq!(out, "projects\ninfra\n");
}

#[tokio::test]
async fn test_empty_instance_uses_service_proxy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/proxy/service/hcaas"))
        .and(query_param("callback", "/resources/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["infra"])))
        .expect(1)
        .mount(&server)
        .await;

    let (_, out, _) = run_plugin(&server, &["list-groups", "hcaas", ""]).await;

    assert_eq!(out, "infra\n");
}

#[tokio::test]
async fn test_target_without_scheme_defaults_to_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSTANCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["infra"])))
        .expect(1)
        .mount(&server)
        .await;

    let address = server.address().to_string();
    let env = TestEnv::platform(&format!("{}/", address));
    let dispatcher = Dispatcher::new(CommandRegistry::new(), env.lookup());
    let args: Vec<String> = ["list-groups", "hcaas", "mysite"].iter().map(|a| a.to_string()).collect();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = dispatcher.run(&args, &mut out, &mut err).await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(String::from_utf8(out).unwrap(), "infra\n");
}

#[tokio::test]
async fn test_transport_error_is_printed() {
    // Nothing listens on the port once the listener is dropped.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let env = TestEnv::platform(&uri);
    let dispatcher = Dispatcher::new(CommandRegistry::new(), env.lookup());
    let args: Vec<String> = ["list-urls", "hcaas", "mysite"].iter().map(|a| a.to_string()).collect();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = dispatcher.run(&args, &mut out, &mut err).await;
    let out = String::from_utf8(out).unwrap();

    assert_eq!(code, EXIT_OK);
    assert!(out.starts_with("error: "), "unexpected output: {out}");
    assert!(out.ends_with(".\n"));
}
