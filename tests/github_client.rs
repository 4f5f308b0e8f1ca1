use gh_label_importer::{
    ClientOptions, Error, GitHubClient, Label, LabelService, LabelStatus, LabelSyncer,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn label_json(id: u64, name: &str, color: &str) -> serde_json::Value {
    json!({
        "id": id,
        "node_id": format!("LA_{}", id),
        "url": format!("https://api.github.com/repos/owner/repo/labels/{}", name),
        "name": name,
        "color": color,
        "default": false,
        "description": null
    })
}

async fn client(server: &MockServer) -> GitHubClient {
    let options = ClientOptions {
        base_uri: Some(server.uri()),
        skip_token_check: true,
    };
    GitHubClient::new("test-token", "owner", "repo", &options)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            label_json(1, "bug", "d73a4a"),
            label_json(2, "question", "d876e3"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).await.list_labels().await.unwrap();
    assert_eq!(page.labels.len(), 2);
    assert_eq!(page.labels[0].name, "bug");
    assert_eq!(page.labels[1].color, "d876e3");
    assert_eq!(page.meta.pages, 1);
}

#[tokio::test]
async fn test_list_labels_missing_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Repository gone",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let result = client(&server).await.list_labels().await;
    assert!(matches!(result, Err(Error::RepositoryNotFound(repo)) if repo == "owner/repo"));
}

#[tokio::test]
async fn test_create_label_sends_normalized_color() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/owner/repo/labels"))
        .and(body_partial_json(json!({"name": "feature", "color": "00ff00"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(label_json(3, "feature", "00ff00")))
        .expect(1)
        .mount(&server)
        .await;

    let label = Label::new("feature", "#00FF00").unwrap();
    let created = client(&server).await.create_label(&label).await.unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(created.name, "feature");
}

#[tokio::test]
async fn test_create_duplicate_label_is_reported_as_duplicate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/owner/repo/labels"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{"resource": "Label", "code": "already_exists", "field": "name"}],
            "documentation_url": "https://docs.github.com/rest/issues/labels#create-a-label"
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let label = Label::new("bug", "d73a4a").unwrap();

    match client.create_label(&label).await {
        Err(Error::Remote(remote)) => assert!(remote.is_already_exists()),
        other => panic!("expected remote error, got {:?}", other),
    }

    let mut syncer = LabelSyncer::with_service(client, None);
    let outcome = syncer.create_label(&label).await;
    assert_eq!(outcome.status, LabelStatus::Duplicate);
    assert_eq!(outcome.error_message(), Some("Validation Failed"));
}

#[tokio::test]
async fn test_delete_label_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/owner/repo/labels/bug"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repos/owner/repo/labels/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let mut syncer = LabelSyncer::with_service(client(&server).await, None);
    let outcomes = syncer
        .delete_labels(&[Label::named("bug"), Label::named("missing")])
        .await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(syncer.deleted_labels().len(), 2);
    let failed = outcomes.iter().find(|o| o.name == "missing").unwrap();
    assert_eq!(failed.status, LabelStatus::Error);
    assert!(failed.error_message().unwrap().contains("Not Found"));
    let deleted = outcomes.iter().find(|o| o.name == "bug").unwrap();
    assert_eq!(deleted.status, LabelStatus::Success);
}

#[tokio::test]
async fn test_delete_with_revoked_token_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    match client.delete_label("bug").await {
        Err(Error::Remote(remote)) => assert_eq!(remote.status, Some(401)),
        other => panic!("expected remote error, got {:?}", other),
    }

    let mut syncer = LabelSyncer::with_service(client, None);
    let outcome = syncer.delete_label(&Label::named("bug")).await;
    assert_eq!(outcome.status, LabelStatus::Error);
    assert!(outcome.error_message().unwrap().contains("Bad credentials"));
    assert_eq!(syncer.deleted_labels().len(), 1);
}

#[tokio::test]
async fn test_delete_encodes_label_name() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/owner/repo/labels/good%20first%20issue"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .await
        .delete_label("good first issue")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_import_purges_before_creating() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([label_json(1, "bug", "d73a4a")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repos/owner/repo/labels/bug"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/owner/repo/labels"))
        .respond_with(ResponseTemplate::new(201).set_body_json(label_json(2, "feature", "00ff00")))
        .expect(1)
        .mount(&server)
        .await;

    let mut syncer = LabelSyncer::with_service(client(&server).await, None);
    let desired = vec![Label::new("feature", "00ff00").unwrap()];
    let result = syncer.import_labels(&desired, true).await.unwrap();

    assert_eq!(result.succeeded(), 2);
    assert!(!result.has_failures());

    let methods: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.method.to_string())
        .collect();
    assert_eq!(methods, vec!["GET", "DELETE", "POST"]);
}

#[tokio::test]
async fn test_import_without_purge_never_lists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/owner/repo/labels"))
        .respond_with(ResponseTemplate::new(201).set_body_json(label_json(2, "feature", "00ff00")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut syncer = LabelSyncer::with_service(client(&server).await, None);
    let desired = vec![Label::new("feature", "00ff00").unwrap()];
    let result = syncer.import_labels(&desired, false).await.unwrap();

    assert!(result.purged.is_empty());
    assert_eq!(result.created.len(), 1);
    assert!(syncer.deleted_labels().is_empty());
}

#[tokio::test]
async fn test_invalid_token_fails_at_construction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let options = ClientOptions {
        base_uri: Some(server.uri()),
        skip_token_check: false,
    };
    let result = GitHubClient::new("bad-token", "owner", "repo", &options).await;
    assert!(matches!(result, Err(Error::AuthenticationFailed)));
}

#[tokio::test]
async fn test_server_error_at_construction_is_not_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "message": "Service Unavailable"
        })))
        .mount(&server)
        .await;

    let options = ClientOptions {
        base_uri: Some(server.uri()),
        skip_token_check: false,
    };
    let result = GitHubClient::new("token", "owner", "repo", &options).await;
    assert!(result.is_err());
    assert!(!matches!(result, Err(Error::AuthenticationFailed)));
}
