//! Integration test for NzbGetClient with a chained sequence: add -> list -> pause -> priority -> remove -> destroy.
//! Requires a running NZBGet daemon and environment configuration:
//! - NZBGET_URL (default: http://localhost:6789/jsonrpc)
//! - NZBGET_USERNAME / NZBGET_PASSWORD (optional)
//!
//! The NZB added here points at a made-up article, so the daemon never completes it.

#![allow(unused_crate_dependencies)]

use std::fs;

use nzbget_controller::NzbGetClient;
use nzbget_types::{AddOptions, DownloadQueue, Priority};

const LIVE_NZB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nzb xmlns="http://www.newzbin.com/DTD/2003/nzb">
  <head>
    <meta type="name">nzbget-controller.chained-flow</meta>
  </head>
  <file poster="tests@example.com" date="1700000000" subject="flow.bin (1/1)">
    <groups><group>alt.binaries.test</group></groups>
    <segments>
      <segment bytes="1024" number="1">missing-article@nzbget-controller.invalid</segment>
    </segments>
  </file>
</nzb>
"#;

#[test_log::test(tokio::test)]
#[ignore = "requires a running NZBGet daemon"]
async fn nzbget_controller_chained_flow() {
    let client = NzbGetClient::from_env().expect("failed to initialize NzbGetClient");

    let version = client.version().await.expect("failed to read version");
    assert!(!version.version.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let nzb = dir.path().join("flow.nzb");
    fs::write(&nzb, LIVE_NZB).unwrap();

    // 1. Add paused so nothing is downloaded
    let options = AddOptions {
        add_paused: true,
        ..AddOptions::default()
    };
    let id = client
        .add_file(&nzb, options)
        .await
        .expect("failed to add nzb");
    assert!(id > 0);

    // 2. Our group is in the queue
    let snapshot = client.list().await.expect("failed to list queue");
    let group = snapshot
        .groups
        .iter()
        .find(|g| g.id == id)
        .expect("added group not found in queue");
    assert_eq!(group.name, "nzbget-controller.chained-flow");

    // 3. Pause and reprioritize
    client.pause(id).await.expect("failed to pause group");
    client
        .set_priority(id, Priority::High)
        .await
        .expect("failed to set priority");
    let groups = client.groups().await.expect("failed to list groups");
    let group = groups.iter().find(|g| g.id == id).unwrap();
    assert_eq!(group.priority, Priority::High);

    // 4. Remove from the queue, then drop the history entry
    client.remove(id).await.expect("failed to remove group");
    let groups = client.groups().await.expect("failed to list groups");
    assert!(
        !groups.iter().any(|g| g.id == id),
        "group was not removed"
    );

    let history = client.history(true).await.expect("failed to read history");
    assert!(history.iter().any(|h| h.id == id));
    client.destroy(id).await.expect("failed to destroy history entry");
}
