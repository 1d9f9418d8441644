//! Backup fixtures shared by the integration tests.
//!
//! A [`Backup`] collects the entries of a Moodle backup in memory and can
//! write them out either as an extracted directory or as a `.mbz` archive,
//! so every scenario can run against both store kinds.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

pub const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

#[derive(Debug, Default, Clone)]
pub struct Backup {
    entries: Vec<(String, Vec<u8>)>,
    files: Vec<(String, String, String)>,
    files_xml: Option<String>,
}

impl Backup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `<file>` entry to `files.xml` without a payload.
    pub fn file_entry(mut self, id: &str, hash: &str, filename: &str) -> Self {
        self.files
            .push((id.to_string(), hash.to_string(), filename.to_string()));
        self
    }

    /// Add a `<file>` entry and its payload under `files/<hh>/<hash>`.
    pub fn file(self, id: &str, hash: &str, filename: &str, content: &[u8]) -> Self {
        let path = format!("files/{}/{hash}", &hash[..2]);
        self.file_entry(id, hash, filename).raw(&path, content)
    }

    /// Add an `activities/<bundle>` folder bundle.
    pub fn folder(self, bundle: &str, name: &str, ids: &[&str]) -> Self {
        let folder_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<activity id="1" moduleid="2" modulename="folder" contextid="3">
  <folder id="1">
    <name>{name}</name>
    <intro></intro>
    <introformat>1</introformat>
    <revision>1</revision>
  </folder>
</activity>"#
        );
        let refs: String = ids
            .iter()
            .map(|id| format!("\n    <file>\n      <id>{id}</id>\n    </file>"))
            .collect();
        let inforef_xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<inforef>\n  <fileref>{refs}\n  </fileref>\n</inforef>"
        );
        self.raw(&format!("activities/{bundle}/folder.xml"), folder_xml.as_bytes())
            .raw(&format!("activities/{bundle}/inforef.xml"), inforef_xml.as_bytes())
    }

    /// Add an arbitrary entry.
    pub fn raw(mut self, path: &str, content: &[u8]) -> Self {
        self.entries.push((path.to_string(), content.to_vec()));
        self
    }

    /// Replace the generated `files.xml` with literal content.
    pub fn files_xml(mut self, xml: &str) -> Self {
        self.files_xml = Some(xml.to_string());
        self
    }

    /// Omit `files.xml` entirely.
    pub fn without_files_xml(mut self) -> Self {
        self.files_xml = Some(String::new());
        self
    }

    fn all_entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries = Vec::new();
        match &self.files_xml {
            Some(xml) if xml.is_empty() => {}
            Some(xml) => entries.push(("files.xml".to_string(), xml.clone().into_bytes())),
            None => entries.push(("files.xml".to_string(), self.render_files_xml().into_bytes())),
        }
        entries.extend(self.entries.iter().cloned());
        entries
    }

    fn render_files_xml(&self) -> String {
        let files: String = self
            .files
            .iter()
            .map(|(id, hash, name)| {
                format!(
                    r#"
  <file id="{id}">
    <contenthash>{hash}</contenthash>
    <contextid>27</contextid>
    <component>mod_folder</component>
    <filearea>content</filearea>
    <itemid>0</itemid>
    <filepath>/</filepath>
    <filename>{name}</filename>
    <userid>2</userid>
    <filesize>0</filesize>
    <mimetype>text/plain</mimetype>
    <status>0</status>
    <timecreated>1700000000</timecreated>
    <timemodified>1700000000</timemodified>
    <source>$@NULL@$</source>
    <author>$@NULL@$</author>
    <license>$@NULL@$</license>
    <sortorder>0</sortorder>
    <repositorytype>$@NULL@$</repositorytype>
    <repositoryid>$@NULL@$</repositoryid>
    <reference>$@NULL@$</reference>
  </file>"#
                )
            })
            .collect();
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<files>{files}\n</files>\n")
    }

    /// Write the backup as an extracted directory at `root`.
    pub fn write_dir(&self, root: &Path) {
        fs::create_dir_all(root.join("activities")).unwrap();
        for (path, content) in self.all_entries() {
            let target = root.join(&path);
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(target, content).unwrap();
        }
    }

    /// Write the backup as a gzip-compressed tar at `path`.
    pub fn write_mbz(&self, path: &Path) {
        let file = fs::File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        builder
            .append_data(&mut header, "activities", std::io::empty())
            .unwrap();

        for (path, content) in self.all_entries() {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, &path, content.as_slice())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }
}

/// Which kind of source a scenario runs against.
#[derive(Debug, Clone, Copy)]
pub enum SourceKind {
    Directory,
    Archive,
}

pub const SOURCE_KINDS: [SourceKind; 2] = [SourceKind::Directory, SourceKind::Archive];

/// Materialize `backup` under `workdir` in the requested form and return the
/// source path to hand to `open_source`.
pub fn materialize_source(backup: &Backup, workdir: &Path, kind: SourceKind) -> std::path::PathBuf {
    match kind {
        SourceKind::Directory => {
            let root = workdir.join("extracted");
            backup.write_dir(&root);
            root
        }
        SourceKind::Archive => {
            let mbz = workdir.join("backup-moodle2-course.mbz");
            backup.write_mbz(&mbz);
            mbz
        }
    }
}

/// Relative paths of every regular file under `root`, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                let rel = path.strip_prefix(base).unwrap();
                let parts: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                out.push(parts.join("/"));
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
