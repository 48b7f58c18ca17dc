// Copyright 2026 The bastion-wrapper authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Precedence-chain tests driven by a fake `ansible-inventory` executable.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use bastion_wrapper::{BastionConfig, BastionResolver, InventoryFetcher, Settings};
use tempfile::{tempdir, TempDir};

/// Drop a fake `ansible-inventory` into `dir` that prints `json` and exits 0.
fn fake_inventory_tool(dir: &Path, json: &str) {
    let path = dir.join("ansible-inventory");
    fs::write(&path, format!("#!/bin/sh\ncat <<'EOF'\n{json}\nEOF\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Drop a fake `ansible-inventory` that fails with `message` on stderr.
fn failing_inventory_tool(dir: &Path, message: &str) {
    let path = dir.join("ansible-inventory");
    fs::write(&path, format!("#!/bin/sh\necho '{message}' >&2\nexit 1\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Settings sandboxed to a temp dir: no real conf file, no cache, and the
/// executable search path restricted to the temp dir.
fn sandbox() -> (TempDir, Settings) {
    let dir = tempdir().unwrap();
    let settings = Settings {
        search_path: Some(dir.path().display().to_string()),
        conf_file: dir.path().join("no-such-config.yml"),
        ..Settings::default()
    };
    (dir, settings)
}

const WEB1_INVENTORY: &str = r#"{"_meta":{"hostvars":{"web1":{"bastion_host":"b.example","bastion_port":2222,"bastion_user":"bob"}}}}"#;

#[test]
fn end_to_end_inventory_resolution() {
    let (dir, settings) = sandbox();
    fake_inventory_tool(dir.path(), WEB1_INVENTORY);

    let config = BastionResolver::new(&settings).resolve("web1", "uptime").unwrap();
    assert_eq!(
        config,
        BastionConfig {
            host: Some("b.example".to_string()),
            port: Some(2222),
            user: Some("bob".to_string()),
        }
    );
}

#[test]
fn inline_tokens_beat_every_other_source() {
    let (dir, settings) = sandbox();
    fake_inventory_tool(dir.path(), WEB1_INVENTORY);
    fs::write(&settings.conf_file, "bastion_host: file_host\n").unwrap();

    let config = BastionResolver::new(&settings)
        .resolve("web1", "BASTION_HOST=inline.example uptime")
        .unwrap();

    // host came inline; port and user still fall through to the inventory
    assert_eq!(config.host.as_deref(), Some("inline.example"));
    assert_eq!(config.port, Some(2222));
    assert_eq!(config.user.as_deref(), Some("bob"));
}

#[test]
fn conf_file_beats_inventory() {
    let (dir, settings) = sandbox();
    fake_inventory_tool(dir.path(), WEB1_INVENTORY);
    fs::write(&settings.conf_file, "bastion_host: file_host\n").unwrap();

    let config = BastionResolver::new(&settings).resolve("web1", "uptime").unwrap();
    assert_eq!(config.host.as_deref(), Some("file_host"));
    assert_eq!(config.port, Some(2222));
}

#[test]
fn inventory_stage_is_skipped_when_earlier_stages_fill_everything() {
    // No inventory tool exists; resolution still succeeds because the
    // config file supplies all three fields.
    let (_dir, settings) = sandbox();
    fs::write(
        &settings.conf_file,
        "bastion_host: file_host\nbastion_port: 2200\nbastion_user: carol\n",
    )
    .unwrap();

    let config = BastionResolver::new(&settings).resolve("web1", "uptime").unwrap();
    assert_eq!(
        config,
        BastionConfig {
            host: Some("file_host".to_string()),
            port: Some(2200),
            user: Some("carol".to_string()),
        }
    );
}

#[test]
fn environment_fallbacks_apply_when_host_is_unknown() {
    let (dir, mut settings) = sandbox();
    fake_inventory_tool(dir.path(), r#"{"_meta":{"hostvars":{}}}"#);
    settings.fallback_host = Some("env.example".to_string());
    settings.fallback_port = Some(2022);
    settings.fallback_user = Some("envuser".to_string());

    let config = BastionResolver::new(&settings).resolve("ghost", "uptime").unwrap();
    assert_eq!(
        config,
        BastionConfig {
            host: Some("env.example".to_string()),
            port: Some(2022),
            user: Some("envuser".to_string()),
        }
    );
}

#[test]
fn hardcoded_defaults_apply_last_and_host_may_stay_unset() {
    let (dir, settings) = sandbox();
    fake_inventory_tool(dir.path(), r#"{"_meta":{"hostvars":{}}}"#);

    let config = BastionResolver::new(&settings).resolve("ghost", "uptime").unwrap();
    assert_eq!(config.host, None);
    assert_eq!(config.port, Some(22));
    assert_eq!(config.user, Some(whoami::username()));
}

#[test]
fn indirect_references_resolve_through_hostvars() {
    let (dir, settings) = sandbox();
    fake_inventory_tool(
        dir.path(),
        r#"{"_meta":{"hostvars":{"web1":{"bastion_host":"{{ gateway }}","gateway":"gw.example"}}}}"#,
    );

    let config = BastionResolver::new(&settings).resolve("web1", "uptime").unwrap();
    assert_eq!(config.host.as_deref(), Some("gw.example"));
}

#[test]
fn cyclic_reference_falls_through_to_the_next_layer() {
    let (dir, mut settings) = sandbox();
    fake_inventory_tool(
        dir.path(),
        r#"{"_meta":{"hostvars":{"web1":{"bastion_host":"{{ loop }}","loop":"{{ bastion_host }}"}}}}"#,
    );
    settings.fallback_host = Some("env.example".to_string());

    let config = BastionResolver::new(&settings).resolve("web1", "uptime").unwrap();
    assert_eq!(config.host.as_deref(), Some("env.example"));
}

#[test]
fn alias_field_matches_when_inventory_is_keyed_by_fqdn() {
    let (dir, settings) = sandbox();
    fake_inventory_tool(
        dir.path(),
        r#"{"_meta":{"hostvars":{"web1.internal":{"ansible_host":"10.0.0.5","bastion_host":"b.example"}}}}"#,
    );

    let vars = InventoryFetcher::new(&settings).host_vars("10.0.0.5").unwrap();
    assert_eq!(vars["bastion_host"], serde_json::json!("b.example"));
}

#[test]
fn unknown_host_yields_an_empty_variable_set() {
    let (dir, settings) = sandbox();
    fake_inventory_tool(dir.path(), WEB1_INVENTORY);

    let vars = InventoryFetcher::new(&settings).host_vars("unknown").unwrap();
    assert!(vars.is_empty());
}

#[test]
fn missing_inventory_executable_is_fatal() {
    let (_dir, settings) = sandbox();

    let err = BastionResolver::new(&settings)
        .resolve("web1", "uptime")
        .unwrap_err();
    assert!(err.to_string().contains("ansible-inventory"));
}

#[test]
fn inventory_tool_failure_is_fatal_and_surfaces_stderr() {
    let (dir, settings) = sandbox();
    failing_inventory_tool(dir.path(), "inventory exploded");

    let err = BastionResolver::new(&settings)
        .resolve("web1", "uptime")
        .unwrap_err();
    assert!(err.to_string().contains("inventory exploded"));
}

#[test]
fn cache_hit_avoids_invoking_the_tool() {
    let (dir, mut settings) = sandbox();
    // The tool would fail if ever invoked.
    failing_inventory_tool(dir.path(), "should not run");

    let cache_path = dir.path().join("inv.cache");
    let inventory = serde_json::from_str(WEB1_INVENTORY).unwrap();
    bastion_wrapper::inventory::cache::write(&cache_path, &inventory).unwrap();
    settings.cache_path = Some(cache_path);

    let config = BastionResolver::new(&settings).resolve("web1", "uptime").unwrap();
    assert_eq!(config.host.as_deref(), Some("b.example"));
}

#[test]
fn fresh_fetch_writes_through_to_the_cache() {
    let (dir, mut settings) = sandbox();
    fake_inventory_tool(dir.path(), WEB1_INVENTORY);
    let cache_path = dir.path().join("inv.cache");
    settings.cache_path = Some(cache_path.clone());

    InventoryFetcher::new(&settings).fetch().unwrap();
    assert!(cache_path.exists());
}

#[test]
fn extra_options_are_passed_before_list() {
    let (dir, mut settings) = sandbox();
    let path = dir.path().join("ansible-inventory");
    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"-i\" ] && [ \"$2\" = \"my_inventory\" ] && [ \"$3\" = \"--list\" ]; then\n\
         cat <<'EOF'\n{WEB1_INVENTORY}\nEOF\n\
         else\n  echo 'unexpected arguments' >&2\n  exit 1\nfi\n"
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    settings.inventory_options = "-i my_inventory".to_string();

    let inventory = InventoryFetcher::new(&settings).fetch().unwrap();
    assert!(inventory.meta.hostvars.contains_key("web1"));
}

#[test]
fn failed_cache_write_does_not_fail_the_fetch() {
    let (dir, mut settings) = sandbox();
    fake_inventory_tool(dir.path(), WEB1_INVENTORY);
    settings.cache_path = Some(PathBuf::from("/nonexistent/dir/inv.cache"));

    let inventory = InventoryFetcher::new(&settings).fetch().unwrap();
    assert!(inventory.meta.hostvars.contains_key("web1"));
}
