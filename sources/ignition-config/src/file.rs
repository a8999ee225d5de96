//! The file module builds [`ManagedFile`]s from raw contents or from an asset that produces
//! several named files.

use crate::dataurl;
use crate::model::ManagedFile;
use std::path::Path;

/// One named payload produced by a [`WritableAsset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Name of the file, relative to wherever the asset is written.
    pub filename: String,
    pub data: Vec<u8>,
}

/// Something that produces an ordered set of named files, such as a rendered set of manifests.
pub trait WritableAsset {
    fn files(&self) -> &[AssetFile];
}

/// Creates a file owned by `username` holding `contents`.
pub fn file_from_bytes<P, U>(path: P, username: U, mode: u32, contents: &[u8]) -> ManagedFile
where
    P: Into<String>,
    U: Into<String>,
{
    ManagedFile::new(
        path,
        Some(username.into()),
        Some(mode),
        dataurl::encode(contents),
    )
}

/// Creates a file owned by `username` holding the UTF-8 bytes of `contents`.
pub fn file_from_string<P, U>(path: P, username: U, mode: u32, contents: &str) -> ManagedFile
where
    P: Into<String>,
    U: Into<String>,
{
    file_from_bytes(path, username, mode, contents.as_bytes())
}

/// Creates one file for each of the asset's files, rooted at `path_prefix`, in the order the
/// asset lists them.
pub fn files_from_asset<A>(
    path_prefix: &str,
    username: &str,
    mode: u32,
    asset: &A,
) -> Vec<ManagedFile>
where
    A: WritableAsset + ?Sized,
{
    asset
        .files()
        .iter()
        .map(|file| {
            file_from_bytes(
                join(path_prefix, &file.filename),
                username,
                mode,
                &file.data,
            )
        })
        .collect()
}

// Asset file names are always relative to the prefix, even when they start with a slash.
fn join(prefix: &str, name: &str) -> String {
    Path::new(prefix)
        .join(name.trim_start_matches('/'))
        .display()
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    struct Manifests(Vec<AssetFile>);

    impl WritableAsset for Manifests {
        fn files(&self) -> &[AssetFile] {
            &self.0
        }
    }

    fn decoded(file: &ManagedFile) -> Vec<u8> {
        dataurl::decode(file.contents().unwrap()).unwrap().data
    }

    #[test]
    fn from_bytes() {
        let file = file_from_bytes("/opt/bin/tool", "root", 0o755, &[0x7f, b'E', b'L', b'F', 0x02]);
        assert_eq!(file.path(), "/opt/bin/tool");
        assert_eq!(file.user(), Some("root"));
        assert_eq!(file.mode(), Some(0o755));
        assert_eq!(decoded(&file), [0x7f, b'E', b'L', b'F', 0x02]);
    }

    #[test]
    fn from_string() {
        let file = file_from_string("/etc/motd", "core", 0o644, "");
        assert_eq!(
            file.contents(),
            Some("data:text/plain;charset=utf-8;base64,")
        );
        assert_eq!(
            file_from_string("/etc/motd", "core", 0o644, "hi"),
            file_from_bytes("/etc/motd", "core", 0o644, b"hi")
        );
    }

    #[test]
    fn from_asset() {
        let asset = Manifests(vec![
            AssetFile {
                filename: "manifests/cvo-overrides.yaml".to_string(),
                data: b"kind: ConfigMap".to_vec(),
            },
            AssetFile {
                filename: "/openshift/99_kubeadmin-password-secret.yaml".to_string(),
                data: b"kind: Secret".to_vec(),
            },
        ]);

        let files = files_from_asset("/opt/openshift/", "root", 0o600, &asset);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path(), "/opt/openshift/manifests/cvo-overrides.yaml");
        assert_eq!(
            files[1].path(),
            "/opt/openshift/openshift/99_kubeadmin-password-secret.yaml"
        );
        assert_eq!(decoded(&files[1]), b"kind: Secret");
        assert!(files.iter().all(|file| file.mode() == Some(0o600)));
    }

    #[test]
    fn from_empty_asset() {
        let asset = Manifests(Vec::new());
        assert!(files_from_asset("/opt", "root", 0o644, &asset).is_empty());
    }
}
