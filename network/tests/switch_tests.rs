//! Network switch orchestration against nullables and a real temp directory.

use std::path::{Path, PathBuf};

use chia_tools_config::{ConfigStore, FieldPath, Value, YamlConfigStore};
use chia_tools_network::{
    CacheRelocation, FsCacheRelocator, NetworkProfile, NetworkSwitch, RestartOutcome, SwitchError,
};
use chia_tools_nullables::{Journal, NullCacheRelocator, NullConfigStore, NullServiceController};
use chia_tools_types::NetworkName;

const MAINNET_CONFIG: &str = r#"
selected_network: mainnet
daemon_port: 55400
self_hostname: localhost
farmer:
  port: 8447
  rpc_port: 8559
  full_node_peers:
    - host: localhost
      port: 8444
full_node:
  port: 8444
  rpc_port: 8555
  database_path: db/blockchain_v2_CHALLENGE.sqlite
  dns_servers:
    - dns-introducer.chia.net
    - chia.ctrlaltdel.ch
  peers_file_path: db/peers.dat
  introducer_peer:
    host: introducer.chia.net
    port: 8444
    enable_private_networks: false
introducer:
  port: 8444
seeder:
  port: 8444
  other_peers_port: 8444
  bootstrap_peers:
    - node.chia.net
timelord:
  full_node_peers:
    - host: localhost
      port: 8444
wallet:
  rpc_port: 9256
  dns_servers:
    - dns-introducer.chia.net
  full_node_peers:
    - host: localhost
      port: 8444
  introducer_peer:
    host: introducer.chia.net
    port: 8444
  wallet_peers_file_path: wallet/db/wallet_peers.dat
  trusted_peers:
    0ThisisanexampleNodeID7ff9d60f1c3fa270c213c0ad0cb89c01274634a7c3cb9: Does_not_matter
"#;

const ROOT: &str = "/chia";

fn root() -> PathBuf {
    PathBuf::from(ROOT)
}

fn db(rest: &str) -> PathBuf {
    root().join("db").join(rest)
}

fn network(name: &str) -> NetworkName {
    NetworkName::new(name).expect("valid network")
}

fn store(journal: &Journal) -> NullConfigStore {
    NullConfigStore::from_yaml(MAINNET_CONFIG)
        .expect("fixture parses")
        .with_journal(journal.clone())
}

/// Every field in `profile` must hold its profile value in `doc`.
fn assert_profile_applied(doc: &chia_tools_config::ConfigDocument, target: &str) {
    let profile = NetworkProfile::resolve(&network(target));
    for (path, value) in profile.field_updates().expect("paths parse") {
        assert_eq!(doc.get(&path), Some(&value), "field {path}");
    }
}

// ── Happy path ─────────────────────────────────────────────────────────

#[tokio::test]
async fn switch_updates_every_field_and_saves_once() {
    let journal = Journal::new();
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::stopped().with_journal(journal.clone()),
        NullCacheRelocator::new().with_journal(journal.clone()),
        root(),
    );

    let report = switch.switch("testneta").await.expect("switch succeeds");
    assert_eq!(report.previous, network("mainnet"));
    assert_eq!(report.target, network("testneta"));
    assert!(!report.stopped);
    assert_eq!(report.restart, RestartOutcome::NotNeeded);

    let saved = switch.store().saved().expect("saved");
    assert_eq!(saved.selected_network().expect("network"), network("testneta"));
    assert_profile_applied(saved, "testneta");
    assert_eq!(switch.store().save_count(), 1);

    // Unrelated fields survive.
    assert_eq!(saved.port_at("wallet.rpc_port"), Some(9256));
    assert_eq!(
        saved.get_str_path("full_node.introducer_peer.enable_private_networks"),
        Some(&Value::Bool(false))
    );
}

#[tokio::test]
async fn switch_back_to_mainnet_restores_mainnet_values() {
    let journal = Journal::new();
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::stopped(),
        NullCacheRelocator::new(),
        root(),
    );
    switch.switch("testnet11").await.expect("to testnet11");
    switch.switch("mainnet").await.expect("back to mainnet");

    let saved = switch.store().saved().expect("saved");
    assert_profile_applied(saved, "mainnet");
    assert_eq!(saved.port_at("full_node.port"), Some(8444));
    assert_eq!(switch.store().save_count(), 2);
}

#[tokio::test]
async fn end_to_end_mainnet_to_testneta_with_running_node() {
    let journal = Journal::new();
    let relocator = NullCacheRelocator::new()
        .with_file(db("sub-epoch-summaries"), b"mainnet ses")
        .with_file(db("height-to-hash"), b"mainnet h2h")
        .with_journal(journal.clone());
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::running().with_journal(journal.clone()),
        relocator,
        root(),
    );

    let report = switch.switch("testneta").await.expect("switch succeeds");
    assert!(report.stopped);
    assert_eq!(report.restart, RestartOutcome::Restarted);
    assert_eq!(report.caches, CacheRelocation::Performed { moved: 2 });

    // Node stopped once and restarted once.
    assert_eq!(journal.count("stop_service chia_full_node"), 1);
    assert_eq!(journal.count("start_service chia_full_node"), 1);
    assert!(switch.services().is_full_node_running());

    // Both cache files archived under db/mainnet, nothing active.
    let relocator = switch.relocator();
    assert_eq!(
        relocator.file(&db("mainnet/sub-epoch-summaries")),
        Some(b"mainnet ses".to_vec())
    );
    assert_eq!(relocator.file(&db("mainnet/height-to-hash")), Some(b"mainnet h2h".to_vec()));
    assert_eq!(relocator.file(&db("sub-epoch-summaries")), None);
    assert_eq!(relocator.file(&db("height-to-hash")), None);
    assert!(relocator.has_dir(&db("mainnet")));
    assert!(relocator.has_dir(&db("testneta")));

    // Config saved once with testneta values.
    assert_eq!(switch.store().save_count(), 1);
    assert_profile_applied(switch.store().saved().expect("saved"), "testneta");

    // Ordering: stop, then moves, then fields, then save, then start.
    let stop = journal.position("stop_service").expect("stopped");
    let first_move = journal.position("relocate").expect("moved");
    let first_set = journal.position("set_field").expect("fields set");
    let save = journal.position("save").expect("saved");
    let start = journal.position("start_service").expect("started");
    assert!(stop < first_move);
    assert!(first_move < first_set);
    assert!(first_set < save);
    assert!(save < start);
}

#[tokio::test]
async fn archived_target_files_become_active() {
    let relocator = NullCacheRelocator::new()
        .with_file(db("sub-epoch-summaries"), b"mainnet")
        .with_file(db("testneta/sub-epoch-summaries"), b"testneta")
        .with_file(db("testneta/height-to-hash"), b"testneta h2h");
    let mut switch = NetworkSwitch::new(
        store(&Journal::new()),
        NullServiceController::stopped(),
        relocator,
        root(),
    );

    let report = switch.switch("testneta").await.expect("switch");
    assert_eq!(report.caches, CacheRelocation::Performed { moved: 3 });

    let relocator = switch.relocator();
    assert_eq!(relocator.file(&db("sub-epoch-summaries")), Some(b"testneta".to_vec()));
    assert_eq!(relocator.file(&db("height-to-hash")), Some(b"testneta h2h".to_vec()));
    assert_eq!(relocator.file(&db("mainnet/sub-epoch-summaries")), Some(b"mainnet".to_vec()));
    assert_eq!(relocator.file(&db("testneta/sub-epoch-summaries")), None);
}

// ── Preconditions ──────────────────────────────────────────────────────

#[tokio::test]
async fn same_network_is_rejected_without_side_effects() {
    let journal = Journal::new();
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::running().with_journal(journal.clone()),
        NullCacheRelocator::new().with_journal(journal.clone()),
        root(),
    );

    let err = switch.switch("mainnet").await.expect_err("same network");
    assert!(matches!(err, SwitchError::InvalidArgument(_)));
    assert!(journal.is_empty(), "unexpected calls: {:?}", journal.entries());
    assert!(switch.store().saved().is_none());
}

#[tokio::test]
async fn invalid_names_are_rejected_without_side_effects() {
    for name in ["", "   ", "../etc", "a/b", "..", "."] {
        let journal = Journal::new();
        let mut switch = NetworkSwitch::new(
            store(&journal),
            NullServiceController::running().with_journal(journal.clone()),
            NullCacheRelocator::new().with_journal(journal.clone()),
            root(),
        );
        let err = switch.switch(name).await.expect_err("invalid name");
        assert!(matches!(err, SwitchError::InvalidArgument(_)), "{name:?}");
        assert!(journal.is_empty(), "{name:?}: {:?}", journal.entries());
    }
}

#[tokio::test]
async fn missing_selected_network_is_a_config_error() {
    let journal = Journal::new();
    let mut switch = NetworkSwitch::new(
        NullConfigStore::from_yaml("full_node:\n  port: 8444\n").expect("parse"),
        NullServiceController::running().with_journal(journal.clone()),
        NullCacheRelocator::new().with_journal(journal.clone()),
        root(),
    );
    let err = switch.switch("testneta").await.expect_err("no selected_network");
    assert!(matches!(err, SwitchError::Config(_)));
    assert!(journal.is_empty());
}

// ── Service control ────────────────────────────────────────────────────

#[tokio::test]
async fn refused_daemon_skips_stop_and_start() {
    let journal = Journal::new();
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::refusing().with_journal(journal.clone()),
        NullCacheRelocator::new().with_journal(journal.clone()),
        root(),
    );

    let report = switch.switch("testneta").await.expect("switch proceeds");
    assert!(!report.stopped);
    assert_eq!(report.restart, RestartOutcome::NotNeeded);
    assert_eq!(journal.count("is_running"), 1);
    assert_eq!(journal.count("stop_service"), 0);
    assert_eq!(journal.count("start_service"), 0);
    assert_eq!(switch.store().save_count(), 1);
}

#[tokio::test]
async fn other_query_errors_abort_before_moving_files() {
    let journal = Journal::new();
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::running()
            .failing_query("tls handshake failed")
            .with_journal(journal.clone()),
        NullCacheRelocator::new().with_journal(journal.clone()),
        root(),
    );

    let err = switch.switch("testneta").await.expect_err("query fails");
    assert!(matches!(err, SwitchError::ServiceQuery(_)));
    assert_eq!(journal.count("relocate"), 0);
    assert_eq!(journal.count("set_field"), 0);
}

#[tokio::test]
async fn failed_stop_aborts_before_moves_and_fields() {
    let journal = Journal::new();
    let relocator = NullCacheRelocator::new()
        .with_file(db("height-to-hash"), b"mainnet")
        .with_journal(journal.clone());
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::running()
            .failing_stop("unknown error")
            .with_journal(journal.clone()),
        relocator,
        root(),
    );

    let err = switch.switch("testneta").await.expect_err("stop fails");
    assert!(matches!(err, SwitchError::ServiceStop(_)));
    assert_eq!(journal.count("relocate"), 0);
    assert_eq!(journal.count("set_field"), 0);
    assert_eq!(journal.count("save"), 0);
    assert_eq!(journal.count("start_service"), 0);
    assert_eq!(
        switch.relocator().file(&db("height-to-hash")),
        Some(b"mainnet".to_vec())
    );
}

#[tokio::test]
async fn failed_restart_is_reported_not_raised() {
    let journal = Journal::new();
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::running()
            .failing_start("service failed to start")
            .with_journal(journal.clone()),
        NullCacheRelocator::new(),
        root(),
    );

    let report = switch.switch("testneta").await.expect("switch still succeeds");
    assert!(report.stopped);
    match report.restart {
        RestartOutcome::Failed(reason) => assert!(reason.contains("service failed to start")),
        other => panic!("unexpected restart outcome: {other:?}"),
    }
    assert_eq!(switch.store().save_count(), 1);
}

// ── Partial failures and resume ────────────────────────────────────────

#[tokio::test]
async fn relocation_failure_leaves_config_untouched() {
    let journal = Journal::new();
    let relocator = NullCacheRelocator::new()
        .with_file(db("sub-epoch-summaries"), b"mainnet")
        .failing_on(db("sub-epoch-summaries"))
        .with_journal(journal.clone());
    let mut switch = NetworkSwitch::new(
        store(&journal),
        NullServiceController::stopped(),
        relocator,
        root(),
    );

    let err = switch.switch("testneta").await.expect_err("move fails");
    match err {
        SwitchError::CacheRelocation { path, .. } => assert_eq!(path, db("sub-epoch-summaries")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(journal.count("set_field"), 0);
    assert!(switch.store().saved().is_none());
}

#[tokio::test]
async fn unknown_parent_fails_before_any_field_is_set() {
    let journal = Journal::new();
    // No `timelord` section: `timelord.full_node_peers` cannot be resolved.
    let yaml = MAINNET_CONFIG.replace(
        "timelord:\n  full_node_peers:\n    - host: localhost\n      port: 8444\n",
        "",
    );
    let mut switch = NetworkSwitch::new(
        NullConfigStore::from_yaml(&yaml)
            .expect("parse")
            .with_journal(journal.clone()),
        NullServiceController::stopped(),
        NullCacheRelocator::new(),
        root(),
    );

    let err = switch.switch("testneta").await.expect_err("unknown path");
    assert!(matches!(err, SwitchError::ConfigField(_)));
    assert_eq!(journal.count("set_field"), 0);
    assert_eq!(journal.count("save"), 0);
    assert_eq!(
        switch.store().document().selected_network().expect("network"),
        network("mainnet")
    );
}

#[tokio::test]
async fn missing_leaf_in_existing_section_is_created() {
    let yaml = MAINNET_CONFIG.replace("  other_peers_port: 8444\n", "");
    let mut switch = NetworkSwitch::new(
        NullConfigStore::from_yaml(&yaml).expect("parse"),
        NullServiceController::stopped(),
        NullCacheRelocator::new(),
        root(),
    );
    switch.switch("testneta").await.expect("switch");
    let saved = switch.store().saved().expect("saved");
    assert_eq!(saved.port_at("seeder.other_peers_port"), Some(58444));
}

#[tokio::test]
async fn save_failure_is_config_save_error() {
    let mut switch = NetworkSwitch::new(
        NullConfigStore::from_yaml(MAINNET_CONFIG)
            .expect("parse")
            .failing_save(),
        NullServiceController::running(),
        NullCacheRelocator::new(),
        root(),
    );
    let err = switch.switch("testneta").await.expect_err("save fails");
    assert!(matches!(err, SwitchError::ConfigSave(_)));
    // No restart after a failed save; the node stays stopped for the operator.
    assert!(!switch.services().is_full_node_running());
}

#[tokio::test]
async fn resumes_after_save_failure_without_moving_files_twice() {
    let journal = Journal::new();
    let relocator = NullCacheRelocator::new()
        .with_file(db("sub-epoch-summaries"), b"mainnet")
        .with_file(db("testneta/sub-epoch-summaries"), b"testneta")
        .with_journal(journal.clone());

    // First attempt moves files, then fails to save.
    let mut first = NetworkSwitch::new(
        NullConfigStore::from_yaml(MAINNET_CONFIG)
            .expect("parse")
            .failing_save(),
        NullServiceController::stopped(),
        relocator,
        root(),
    );
    first.switch("testneta").await.expect_err("save fails");
    let moves_after_first = journal.count("relocate");
    assert_eq!(moves_after_first, 4);

    // The retry sees the marker and leaves the active files alone.
    let relocator = first.into_relocator();
    let mut retry = NetworkSwitch::new(
        store(&journal),
        NullServiceController::stopped(),
        relocator,
        root(),
    );
    let report = retry.switch("testneta").await.expect("retry succeeds");
    assert_eq!(report.caches, CacheRelocation::AlreadyDone);
    assert_eq!(journal.count(&departure(&db("sub-epoch-summaries"))), 1);
    assert_eq!(journal.count(&departure(&db("height-to-hash"))), 1);
    assert_eq!(
        retry.relocator().file(&db("sub-epoch-summaries")),
        Some(b"testneta".to_vec())
    );
    assert_eq!(
        retry.relocator().file(&db("mainnet/sub-epoch-summaries")),
        Some(b"mainnet".to_vec())
    );
    assert_profile_applied(retry.store().saved().expect("saved"), "testneta");
}

#[tokio::test]
async fn resumes_after_an_arriving_move_fails() {
    let journal = Journal::new();
    let relocator = NullCacheRelocator::new()
        .with_file(db("sub-epoch-summaries"), b"mainnet ses")
        .with_file(db("height-to-hash"), b"mainnet h2h")
        .with_file(db("testneta/sub-epoch-summaries"), b"testneta ses")
        .with_file(db("testneta/height-to-hash"), b"testneta h2h")
        .failing_on(db("testneta/height-to-hash"))
        .with_journal(journal.clone());

    // Departures and the first arrival succeed, the second arrival fails.
    let mut first = NetworkSwitch::new(
        store(&journal),
        NullServiceController::stopped(),
        relocator,
        root(),
    );
    let err = first.switch("testneta").await.expect_err("arrival fails");
    match err {
        SwitchError::CacheRelocation { path, .. } => {
            assert_eq!(path, db("testneta/height-to-hash"))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(first.store().saved().is_none());

    let relocator = first.into_relocator().without_failure();
    let mut retry = NetworkSwitch::new(
        store(&journal),
        NullServiceController::stopped(),
        relocator,
        root(),
    );
    let report = retry.switch("testneta").await.expect("retry succeeds");
    assert_eq!(report.caches, CacheRelocation::Performed { moved: 1 });

    // The active testneta file is never archived as mainnet's.
    assert_eq!(journal.count(&departure(&db("sub-epoch-summaries"))), 1);
    let relocator = retry.relocator();
    assert_eq!(
        relocator.file(&db("mainnet/sub-epoch-summaries")),
        Some(b"mainnet ses".to_vec())
    );
    assert_eq!(
        relocator.file(&db("mainnet/height-to-hash")),
        Some(b"mainnet h2h".to_vec())
    );
    assert_eq!(relocator.file(&db("sub-epoch-summaries")), Some(b"testneta ses".to_vec()));
    assert_eq!(relocator.file(&db("height-to-hash")), Some(b"testneta h2h".to_vec()));
    assert_profile_applied(retry.store().saved().expect("saved"), "testneta");
}

/// Journal prefix of a move out of the active location.
fn departure(active: &Path) -> String {
    format!("relocate {} ->", active.display())
}

// ── Real filesystem ────────────────────────────────────────────────────

fn write_root(dir: &Path) -> PathBuf {
    let config_dir = dir.join("config");
    std::fs::create_dir_all(&config_dir).expect("config dir");
    std::fs::create_dir_all(dir.join("db")).expect("db dir");
    let config_path = config_dir.join("config.yaml");
    std::fs::write(&config_path, MAINNET_CONFIG).expect("write config");
    config_path
}

#[tokio::test]
async fn end_to_end_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = write_root(dir.path());
    let db_dir = dir.path().join("db");
    std::fs::write(db_dir.join("sub-epoch-summaries"), b"ses").expect("write");
    std::fs::write(db_dir.join("height-to-hash"), b"h2h").expect("write");

    let store = YamlConfigStore::load(&config_path, dir.path()).expect("load");
    let mut switch = NetworkSwitch::new(
        store,
        NullServiceController::running(),
        FsCacheRelocator,
        dir.path(),
    );
    let report = switch.switch("testneta").await.expect("switch");
    assert_eq!(report.restart, RestartOutcome::Restarted);

    assert!(!db_dir.join("sub-epoch-summaries").exists());
    assert!(!db_dir.join("height-to-hash").exists());
    assert_eq!(std::fs::read(db_dir.join("mainnet/sub-epoch-summaries")).expect("read"), b"ses");
    assert_eq!(std::fs::read(db_dir.join("mainnet/height-to-hash")).expect("read"), b"h2h");
    assert!(db_dir.join("testneta").is_dir());

    let reloaded = YamlConfigStore::load(&config_path, dir.path()).expect("reload");
    assert_profile_applied(reloaded.document(), "testneta");
    assert_eq!(
        reloaded
            .document()
            .get(&FieldPath::parse("wallet.trusted_peers").expect("path"))
            .and_then(Value::as_mapping)
            .map(|m| m.len()),
        Some(1)
    );
}

#[tokio::test]
async fn no_cache_files_on_disk_is_fine() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = write_root(dir.path());
    let store = YamlConfigStore::load(&config_path, dir.path()).expect("load");
    let mut switch = NetworkSwitch::new(
        store,
        NullServiceController::refusing(),
        FsCacheRelocator,
        dir.path(),
    );
    let report = switch.switch("testneta").await.expect("switch");
    assert_eq!(report.caches, CacheRelocation::Performed { moved: 0 });
    assert!(dir.path().join("db/mainnet").is_dir());
    assert!(dir.path().join("db/testneta").is_dir());
}
