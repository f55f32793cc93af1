//! `bigip folder` command flows against a wiremock device.

use bigip_cli::commands::folder::{self, CreateOutcome, FolderArgs, FolderCommands};
use bigip_cli::output::OutputFormat;
use bigip_common::ProviderConfig;
use bigip_provider::BigIpClient;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FOLDER_PATH: &str = "/mgmt/tm/sys/folder/~Common~apps";

fn client_for(server: &MockServer) -> BigIpClient {
    let config = ProviderConfig {
        address: server.uri(),
        username: "admin".to_string(),
        password: "secret".to_string(),
        token_auth: false,
        ..Default::default()
    };
    BigIpClient::new(&config).unwrap()
}

fn device_folder(description: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "tm:sys:folder:folderstate",
        "name": "apps",
        "partition": "Common",
        "fullPath": "/Common/apps",
        "description": description,
        "deviceGroup": "default",
        "hidden": "false",
        "noRefCheck": "false",
        "trafficGroup": "default"
    })
}

#[tokio::test]
async fn test_create_adds_missing_folder() {
    let mock_server = MockServer::start().await;

    // Both lookups before the add see nothing
    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/mgmt/tm/sys/folder"))
        .and(body_json(serde_json::json!({
            "name": "/Common/apps",
            "description": "team a",
            "deviceGroup": "default",
            "hidden": "false",
            "trafficGroup": "default"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_folder("team a")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_folder("team a")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let attrs = FolderArgs {
        description: Some("team a".to_string()),
        ..Default::default()
    };

    let (data, outcome) = folder::create(&client, "/Common/apps", &attrs).await.unwrap();

    assert_eq!(outcome, CreateOutcome::Created);
    assert_eq!(data.id(), "/Common/apps");
    assert_eq!(data.get_string("description"), Some("team a"));
}

#[tokio::test]
async fn test_create_adopts_existing_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_folder("already here")))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let (data, outcome) = folder::create(&client, "/Common/apps", &FolderArgs::default())
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::Adopted);
    assert_eq!(outcome.message("/Common/apps"), "Folder '/Common/apps' already exists, adopted");
    assert_eq!(data.get_string("description"), Some("already here"));
}

#[tokio::test]
async fn test_create_command_rejects_empty_name() {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let cmd = FolderCommands::Create {
        name: String::new(),
        attrs: FolderArgs::default(),
    };

    let err = folder::execute(cmd, &client, OutputFormat::Json).await.unwrap_err();
    assert!(format!("{:#}", err).contains("name must not be empty"));
}

#[tokio::test]
async fn test_update_command_keeps_unset_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_folder("team a")))
        .mount(&mock_server)
        .await;

    // description comes from the device, hidden from the flag
    Mock::given(method("PUT"))
        .and(path(FOLDER_PATH))
        .and(body_json(serde_json::json!({
            "name": "/Common/apps",
            "description": "team a",
            "deviceGroup": "default",
            "hidden": "true",
            "noRefCheck": "false",
            "trafficGroup": "default"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_folder("team a")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let cmd = FolderCommands::Update {
        name: "/Common/apps".to_string(),
        attrs: FolderArgs {
            hidden: Some("true".to_string()),
            ..Default::default()
        },
    };

    let result = folder::execute(cmd, &client, OutputFormat::Json).await;
    assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
}

#[tokio::test]
async fn test_update_command_missing_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let cmd = FolderCommands::Update {
        name: "/Common/apps".to_string(),
        attrs: FolderArgs::default(),
    };

    let err = folder::execute(cmd, &client, OutputFormat::Json).await.unwrap_err();
    assert!(err.to_string().contains("Folder /Common/apps not found"));
}

#[tokio::test]
async fn test_delete_command() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let cmd = FolderCommands::Delete {
        name: "/Common/apps".to_string(),
    };

    let result = folder::execute(cmd, &client, OutputFormat::Json).await;
    assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
}

#[tokio::test]
async fn test_delete_command_reports_device_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(FOLDER_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": 400,
            "message": "folder is in use"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let cmd = FolderCommands::Delete {
        name: "/Common/apps".to_string(),
    };

    let err = folder::execute(cmd, &client, OutputFormat::Json).await.unwrap_err();
    assert!(format!("{:#}", err).contains("folder is in use"));
}
