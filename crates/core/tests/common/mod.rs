#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub fn descriptor(id: &str, version: &str) -> String {
    serde_json::json!({
        "schemaVersion": 1,
        "id": id,
        "version": version,
    })
    .to_string()
}

pub fn jar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, bytes) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn jar_bytes_with_dir(files: &[(&str, &[u8])], dir_entry: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.add_directory(dir_entry, options).unwrap();
    for (name, bytes) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_jar(dir: &Path, file_name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, jar_bytes(files)).unwrap();
    path
}

/// A well-formed single-mod jar with just a descriptor inside.
pub fn write_mod_jar(dir: &Path, file_name: &str, id: &str, version: &str) -> PathBuf {
    write_jar(
        dir,
        file_name,
        &[("quarry.mod.json", descriptor(id, version).as_bytes())],
    )
}

pub fn canonical(path: &Path) -> String {
    std::fs::canonicalize(path).unwrap().display().to_string()
}
