// Both generations must give the same meaning to the same operations, however differently they
// lay it out on the wire.

use ignition_config::dataurl;
use ignition_config::file::{file_from_bytes, file_from_string};
use ignition_config::model::MergeStrategy;
use ignition_config::systemd::Dropin;
use ignition_config::{Document, Schema, ADMIN_USER, V2, V3};
use serde_json::Value;

static TEST_PEM: &str = include_str!("data/test-pem");

fn assembled<S: Schema>() -> Document<S> {
    let mut document =
        Document::<S>::shim(TEST_PEM, "c1", "https://swift.example/bootstrap.ign", "tok").unwrap();
    document.add_ssh_keys(["ssh-ed25519 AAAA", "ssh-rsa BBBB"]);
    document.add_systemd_unit("bootkube.service", "[Unit]\nDescription=Bootstrap\n", true);
    document.add_systemd_dropins(
        "kubelet.service",
        &[Dropin::new("10-mco-default-env.conf", "[Service]\n")],
        false,
    );
    document.merge_files(vec![
        file_from_string("/etc/motd", "core", 0o644, "welcome"),
        file_from_bytes("/usr/local/bin/tool", "root", 0o755, &[0x7f, b'E', b'L', b'F']),
        file_from_string("/etc/motd", "root", 0o600, "replaced"),
    ]);
    document
}

fn rendered<S: Schema>(document: &Document<S>) -> Document<S> {
    Document::<S>::from_json(document.to_json().unwrap().as_bytes()).unwrap()
}

// A generation-independent view of a document's content.
#[derive(Debug, PartialEq)]
struct Summary {
    files: Vec<(String, Option<String>, Option<u32>, Vec<u8>)>,
    users: Vec<(String, Vec<String>)>,
    units: Vec<(String, Option<String>, Option<bool>, Vec<String>)>,
    anchors: Vec<String>,
    directives: Vec<(String, MergeStrategy, Vec<(String, Option<String>)>)>,
}

fn summarize<S: Schema>(document: &Document<S>) -> Summary {
    Summary {
        files: document
            .files()
            .iter()
            .map(|file| {
                (
                    file.path().to_string(),
                    file.user().map(str::to_string),
                    file.mode(),
                    dataurl::decode(file.contents().unwrap()).unwrap().data,
                )
            })
            .collect(),
        users: document
            .users()
            .iter()
            .map(|user| (user.name().to_string(), user.ssh_authorized_keys().to_vec()))
            .collect(),
        units: document
            .units()
            .iter()
            .map(|unit| {
                (
                    unit.name().to_string(),
                    unit.contents().map(str::to_string),
                    unit.enabled(),
                    unit.dropins().iter().map(|d| d.name().to_string()).collect(),
                )
            })
            .collect(),
        anchors: document
            .trust_anchors()
            .iter()
            .map(|anchor| anchor.source().to_string())
            .collect(),
        directives: document
            .fetch_directives()
            .iter()
            .map(|directive| {
                (
                    directive.source().to_string(),
                    directive.strategy(),
                    directive
                        .http_headers()
                        .iter()
                        .map(|h| (h.name().to_string(), h.value().map(str::to_string)))
                        .collect(),
                )
            })
            .collect(),
    }
}

#[test]
fn same_semantics() {
    let v2 = assembled::<V2>();
    let v3 = assembled::<V3>();
    assert_eq!(summarize(&v2), summarize(&v3));

    let summary = summarize(&v2);
    assert_eq!(summary.files.len(), 4);
    assert_eq!(summary.files[2].0, "/etc/motd");
    assert_eq!(summary.files[2].3, b"replaced");
    assert_eq!(summary.users[0].0, ADMIN_USER);
    assert_eq!(summary.anchors.len(), 2);
}

#[test]
fn wire_round_trip_preserves_semantics() {
    let v2 = assembled::<V2>();
    let v3 = assembled::<V3>();
    assert_eq!(rendered(&v2), v2);
    assert_eq!(rendered(&v3), v3);
    assert_eq!(summarize(&rendered(&v2)), summarize(&rendered(&v3)));
}

#[test]
fn wire_layout_differs() {
    let v2: Value = serde_json::from_str(&assembled::<V2>().to_json().unwrap()).unwrap();
    let v3: Value = serde_json::from_str(&assembled::<V3>().to_json().unwrap()).unwrap();

    assert_eq!(v2["ignition"]["version"], "2.4.0");
    assert_eq!(v3["ignition"]["version"], "3.1.0");

    assert!(v2["ignition"]["config"]["append"].is_array());
    assert!(v2["ignition"]["config"].get("merge").is_none());
    assert!(v3["ignition"]["config"]["merge"].is_array());
    assert!(v3["ignition"]["config"].get("append").is_none());

    assert_eq!(v2["storage"]["files"][0]["filesystem"], "root");
    assert!(v3["storage"]["files"][0].get("filesystem").is_none());

    assert_eq!(
        v2["ignition"]["config"]["append"][0]["httpHeaders"],
        v3["ignition"]["config"]["merge"][0]["httpHeaders"]
    );
}

#[test]
fn same_size_verdict() {
    use ignition_config::size::MAX_USER_DATA_SIZE;

    assert!(assembled::<V2>().to_bounded_json(MAX_USER_DATA_SIZE).is_ok());
    assert!(assembled::<V3>().to_bounded_json(MAX_USER_DATA_SIZE).is_ok());

    let mut v2 = assembled::<V2>();
    let mut v3 = assembled::<V3>();
    let big = vec![0u8; 50000];
    v2.merge_file(file_from_bytes("/opt/blob", "root", 0o644, &big));
    v3.merge_file(file_from_bytes("/opt/blob", "root", 0o644, &big));
    assert!(v2.to_bounded_json(MAX_USER_DATA_SIZE).is_err());
    assert!(v3.to_bounded_json(MAX_USER_DATA_SIZE).is_err());
}

#[test]
fn pointer_strategy() {
    let v2 = Document::<V2>::pointer("https://api-int.example:22623/config/master", b"ca");
    let v3 = Document::<V3>::pointer("https://api-int.example:22623/config/master", b"ca");
    assert_eq!(summarize(&v2), summarize(&v3));
    assert_eq!(v2.fetch_directives()[0].strategy(), MergeStrategy::Merge);
}
