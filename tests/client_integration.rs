use mockito::{Matcher, Server, ServerGuard};
use npmctl::config::defaults::default_server_config;
use npmctl::core::workflow::{self, CreateRequest, RemoveOutcome};
use npmctl::{with_session, Credentials, NpmClient, NpmError, ProxyHostApi};
use serde_json::json;

const HOSTS: &str = "/api/nginx/proxy-hosts";

fn hosts_body() -> String {
    json!([
        {
            "id": 1,
            "created_on": "2024-01-01 00:00:00",
            "owner_user_id": 1,
            "domain_names": ["template"],
            "forward_scheme": "http",
            "forward_host": "127.0.0.1",
            "forward_port": 80,
            "certificate_id": 0,
            "ssl_forced": false,
            "block_exploits": true,
            "access_list_id": 0,
            "advanced_config": "",
            "meta": {},
            "locations": [],
            "enabled": false
        },
        {
            "id": 9,
            "domain_names": ["a.example.com", "b.example.com"],
            "forward_host": "10.0.0.9",
            "forward_port": 8080
        }
    ])
    .to_string()
}

fn mock_token(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/api/tokens")
        .match_body(Matcher::Json(json!({"identity": "admin", "secret": "secret"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"tok-123","expires":"2030-01-01T00:00:00.000Z"}"#)
        .create()
}

fn credentials(server: &ServerGuard) -> Credentials {
    Credentials::new(server.url(), "admin", "secret", None)
}

#[test]
fn test_authentication_failure_is_auth_error() {
    let mut server = Server::new();
    let token = server
        .mock("POST", "/api/tokens")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Invalid password"}}"#)
        .create();

    let client = NpmClient::new(&server.url()).unwrap();
    let err = client.authenticate("admin", "wrong").err().unwrap();

    token.assert();
    match err {
        NpmError::Auth { message } => assert!(message.contains("Invalid password")),
        other => panic!("expected auth error, got {:?}", other),
    }
}

#[test]
fn test_list_hosts_sends_bearer_token() {
    let mut server = Server::new();
    let token = mock_token(&mut server);
    let list = server
        .mock("GET", HOSTS)
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(hosts_body())
        .create();

    let hosts = with_session(&credentials(&server), &default_server_config(), |session| {
        session.list_hosts()
    })
    .unwrap();

    token.assert();
    list.assert();
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[1].id, 9);
    assert!(hosts[0].extra.contains_key("owner_user_id"));
}

#[test]
fn test_list_hosts_failure_is_fetch_error() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let _list = server
        .mock("GET", HOSTS)
        .with_status(403)
        .with_body("forbidden")
        .create();

    let err = with_session(&credentials(&server), &default_server_config(), |session| {
        session.list_hosts()
    })
    .unwrap_err();

    assert!(matches!(err, NpmError::Fetch { status: 403, ref body } if body == "forbidden"));
}

#[test]
fn test_create_host_posts_template_copy() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let _list = server
        .mock("GET", HOSTS)
        .with_status(200)
        .with_body(hosts_body())
        .create();
    let create = server
        .mock("POST", HOSTS)
        .match_header("authorization", "Bearer tok-123")
        .match_body(Matcher::PartialJson(json!({
            "domain_names": ["new.example.com"],
            "forward_scheme": "http",
            "forward_host": "10.0.0.5",
            "forward_port": 3000,
            "block_exploits": true,
            "enabled": true
        })))
        .with_status(201)
        .with_body(r#"{"id":10}"#)
        .create();

    let request = CreateRequest {
        template: "template".to_string(),
        domains: vec!["new.example.com".to_string()],
        forward_host: "10.0.0.5".to_string(),
        forward_port: 3000,
        check_conflicts: true,
    };
    let outcome = with_session(&credentials(&server), &default_server_config(), |session| {
        workflow::create_host(session, &request)
    })
    .unwrap();

    create.assert();
    assert_eq!(outcome.status, 201);
    assert_eq!(outcome.body, r#"{"id":10}"#);
}

#[test]
fn test_create_host_conflict_sends_no_post() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let _list = server
        .mock("GET", HOSTS)
        .with_status(200)
        .with_body(hosts_body())
        .create();
    let create = server.mock("POST", HOSTS).expect(0).create();

    let request = CreateRequest {
        template: "template".to_string(),
        domains: vec!["b.example.com".to_string()],
        forward_host: "10.0.0.5".to_string(),
        forward_port: 3000,
        check_conflicts: true,
    };
    let err = with_session(&credentials(&server), &default_server_config(), |session| {
        workflow::create_host(session, &request)
    })
    .unwrap_err();

    create.assert();
    assert!(matches!(err, NpmError::Conflict { .. }));
}

#[test]
fn test_remove_domain_puts_remaining_domains() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let _list = server
        .mock("GET", HOSTS)
        .with_status(200)
        .with_body(hosts_body())
        .create();
    let update = server
        .mock("PUT", "/api/nginx/proxy-hosts/9")
        .match_header("authorization", "Bearer tok-123")
        .match_body(Matcher::Json(json!({"domain_names": ["b.example.com"]})))
        .with_status(200)
        .with_body("{}")
        .create();

    let outcome = with_session(&credentials(&server), &default_server_config(), |session| {
        workflow::remove_domain(session, "a.example.com")
    })
    .unwrap();

    update.assert();
    assert!(matches!(outcome, RemoveOutcome::Updated { id: 9, .. }));
}

#[test]
fn test_remove_host_failure_carries_status_and_body() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let delete = server
        .mock("DELETE", "/api/nginx/proxy-hosts/1")
        .with_status(500)
        .with_body("internal error")
        .create();

    let err = with_session(&credentials(&server), &default_server_config(), |session| {
        session.remove_host(1)
    })
    .unwrap_err();

    delete.assert();
    match err {
        NpmError::Write {
            action,
            status,
            body,
        } => {
            assert_eq!(action, "remove");
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected write error, got {:?}", other),
    }
}

#[test]
fn test_session_close() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);

    let session = NpmClient::new(&server.url())
        .unwrap()
        .authenticate("admin", "secret")
        .unwrap();
    assert!(session.is_open());
    session.close();
}
