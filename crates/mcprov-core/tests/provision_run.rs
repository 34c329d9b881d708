//! Whole-run behaviour: skeleton, templates and multi-server sequencing.

mod support;

use std::fs;

use tempfile::TempDir;

use support::{FakeHttp, endpoints, write_file};
use mcprov_core::config::ConfigStore;
use mcprov_core::prelude::*;

fn provisioner(http: FakeHttp, temp: &TempDir) -> Provisioner<FakeHttp> {
    let settings =
        ProvisionSettings::new(temp.path().join("templates")).with_endpoints(endpoints());
    Provisioner::new(http, settings)
}

fn paper(temp: &TempDir, dir: &str) -> ServerSpec {
    ServerSpec::new(temp.path().join(dir), EngineType::Paper).with_mc_version("1.21.1")
}

#[tokio::test]
async fn zero_templates_leave_only_skeleton_and_engine() {
    let temp = TempDir::new().unwrap();
    let provisioner = provisioner(FakeHttp::new().with_paper(), &temp);
    let spec = paper(&temp, "lobby");

    let report = provisioner.provision_server(&spec).await;

    assert!(report.is_done());
    assert_eq!(report.templates_copied, 0);
    let mut entries: Vec<_> = fs::read_dir(&spec.server_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["eula.txt", "paper.jar", "plugins"]);
}

#[tokio::test]
async fn templates_apply_in_order_with_later_overriding() {
    let temp = TempDir::new().unwrap();
    let templates = temp.path().join("templates");
    write_file(&templates.join("base").join("server.properties"), "motd=base");
    write_file(&templates.join("base").join("bukkit.yml"), "base: true");
    write_file(&templates.join("lobby").join("server.properties"), "motd=lobby");
    write_file(
        &templates.join("lobby").join("plugins").join("Essentials").join("config.yml"),
        "spawn: hub",
    );
    let provisioner = provisioner(FakeHttp::new().with_paper(), &temp);
    let spec = paper(&temp, "lobby").with_template("base").with_template("lobby");

    let report = provisioner.provision_server(&spec).await;

    assert!(report.is_done());
    assert_eq!(report.templates_copied, 4);
    assert_eq!(
        fs::read_to_string(spec.server_dir.join("server.properties")).unwrap(),
        "motd=lobby"
    );
    assert!(spec.server_dir.join("bukkit.yml").exists());
    assert!(
        spec.plugins_dir()
            .join("Essentials")
            .join("config.yml")
            .exists()
    );
}

#[tokio::test]
async fn missing_template_fails_after_engine() {
    let temp = TempDir::new().unwrap();
    let provisioner = provisioner(FakeHttp::new().with_paper(), &temp);
    let spec = paper(&temp, "lobby").with_template("does-not-exist");

    let report = provisioner.provision_server(&spec).await;

    assert_eq!(report.stage, ProvisionStage::Failed);
    assert_eq!(report.reached, ProvisionStage::EngineResolved);
    assert!(matches!(report.error, Some(ProvisionError::Configuration(_))));
    assert!(report.plugins.is_empty());
    assert!(spec.server_dir.join("paper.jar").exists());
}

#[tokio::test]
async fn failing_server_does_not_block_the_next() {
    let temp = TempDir::new().unwrap();
    let provisioner = provisioner(FakeHttp::new().with_paper(), &temp);
    let broken = ServerSpec::new(temp.path().join("broken"), EngineType::Paper)
        .with_mc_version("0.0.1")
        .with_name("broken");
    let healthy = paper(&temp, "healthy").with_name("healthy");

    let run = provisioner.provision_all(&[broken, healthy]).await;

    assert!(!run.is_success());
    assert_eq!(run.servers.len(), 2);
    assert_eq!(run.servers[0].stage, ProvisionStage::Failed);
    assert_eq!(run.servers[1].stage, ProvisionStage::Done);
    let failed: Vec<_> = run.failed_servers().map(|s| s.server.as_str()).collect();
    assert_eq!(failed, vec!["broken"]);
}

#[tokio::test]
async fn unwritable_server_dir_fails_at_skeleton() {
    let temp = TempDir::new().unwrap();
    // A regular file where the server directory should be
    let blocker = temp.path().join("lobby");
    fs::write(&blocker, "not a directory").unwrap();
    let provisioner = provisioner(FakeHttp::new().with_paper(), &temp);

    let report = provisioner.provision_server(&paper(&temp, "lobby")).await;

    assert_eq!(report.stage, ProvisionStage::Failed);
    assert_eq!(report.reached, ProvisionStage::Init);
    assert!(matches!(report.error, Some(ProvisionError::Io { .. })));
    assert!(provisioner.http().calls().is_empty());
}

#[tokio::test]
async fn loaded_config_drives_a_full_run() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("tpl").join("base").join("server.properties"),
        "motd=hello",
    );
    let config_path = temp.path().join("mcprov.toml");
    write_file(
        &config_path,
        &format!(
            r#"
template_dir = "tpl"

[endpoints]
build_index = "{}"
marketplace = "{}"
plugin_index = "{}"

[[servers]]
name = "lobby"
server_dir = "servers/lobby"
engine = "paper"
mc_version = "1.21.1"
templates = ["base"]
"#,
            support::INDEX,
            support::MARKET,
            support::PLUGINS
        ),
    );

    let config = ConfigStore::from_path(config_path).load().unwrap();
    let provisioner = Provisioner::new(
        FakeHttp::new().with_paper(),
        ProvisionSettings::from(&config),
    );
    let run = provisioner.provision_all(&config.servers).await;

    assert!(run.is_success());
    let server_dir = temp.path().join("servers").join("lobby");
    assert_eq!(
        fs::read_to_string(server_dir.join("server.properties")).unwrap(),
        "motd=hello"
    );
    assert!(server_dir.join("plugins").is_dir());
}
