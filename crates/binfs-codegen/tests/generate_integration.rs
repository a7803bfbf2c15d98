//! End-to-end tests: directory on disk, generated source, rebuilt filesystem.
//!
//! Output for a temporary directory is parsed with `syn` and each
//! `builder.add(EncodedEntry { .. })` literal is replayed through the runtime
//! crate. Output for fixed records must match the loader fixture that
//! `binfs` compiles and runs in `tests/generated_loader.rs`.

use binfs::{EncodedEntry, FileSystem, FileSystemBuilder, OwnedEncodedEntry, codec};
use chrono::{DateTime, FixedOffset};
use binfs_codegen::{Generator, GeneratorConfig, Snapshot};
use filetime::FileTime;
use std::fs;
use std::io::Read;
use syn::{Expr, Lit, Stmt};
use tempfile::TempDir;

#[derive(Debug, Default)]
struct Fields {
    path: String,
    name: String,
    size: u64,
    mode: u32,
    mod_time: String,
    is_dir: bool,
    content: String,
}

impl Fields {
    fn as_encoded(&self) -> EncodedEntry<'_> {
        EncodedEntry {
            path: &self.path,
            name: &self.name,
            size: self.size,
            mode: self.mode,
            mod_time: &self.mod_time,
            is_dir: self.is_dir,
            content: &self.content,
        }
    }
}

/// Extracts the record literals from a generated loader.
fn parse_records(source: &str) -> Vec<Fields> {
    let file = syn::parse_file(source).unwrap();
    let syn::Item::Fn(loader) = &file.items[0] else {
        panic!("expected a loader function");
    };

    let mut records = Vec::new();
    for stmt in &loader.block.stmts {
        let Stmt::Expr(Expr::MethodCall(call), _) = stmt else {
            continue;
        };
        if call.method != "add" {
            continue;
        }
        let Expr::Struct(literal) = &call.args[0] else {
            panic!("expected a struct literal");
        };

        let mut fields = Fields::default();
        for field in &literal.fields {
            let syn::Member::Named(member) = &field.member else {
                panic!("expected named fields");
            };
            let Expr::Lit(lit) = &field.expr else {
                panic!("expected a literal for {member}");
            };
            match (member.to_string().as_str(), &lit.lit) {
                ("path", Lit::Str(s)) => fields.path = s.value(),
                ("name", Lit::Str(s)) => fields.name = s.value(),
                ("size", Lit::Int(i)) => fields.size = i.base10_parse().unwrap(),
                ("mode", Lit::Int(i)) => fields.mode = i.base10_parse().unwrap(),
                ("mod_time", Lit::Str(s)) => fields.mod_time = s.value(),
                ("is_dir", Lit::Bool(b)) => fields.is_dir = b.value,
                ("content", Lit::Str(s)) => fields.content = s.value(),
                (other, _) => panic!("unexpected field {other}"),
            }
        }
        records.push(fields);
    }
    records
}

fn sample_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("css/vendor")).unwrap();
    fs::create_dir(root.join("empty")).unwrap();
    fs::write(root.join("index.html"), "<!doctype html><title>binfs</title>").unwrap();
    fs::write(root.join("css/site.css"), "body { margin: 0 }").unwrap();
    fs::write(root.join("css/vendor/reset.css"), "* { box-sizing: border-box }").unwrap();
    fs::write(root.join("quote\"d name.txt"), [0u8, 159, 146, 150]).unwrap();

    let pinned = FileTime::from_unix_time(1_600_000_000, 0);
    filetime::set_file_mtime(root.join("index.html"), pinned).unwrap();
    temp
}

fn generate(root: &std::path::Path) -> String {
    let snapshot = Snapshot::capture(root).unwrap();
    Generator::new(GeneratorConfig::default())
        .unwrap()
        .generate(&snapshot)
        .unwrap()
}

#[test]
fn test_generated_source_rebuilds_tree() {
    let temp = sample_tree();
    let records = parse_records(&generate(temp.path()));
    assert_eq!(records.len(), 8);
    assert_eq!(records[0].path, "/");
    assert_eq!(records[0].name, ".");

    let mut builder = FileSystemBuilder::new();
    for record in &records {
        builder.add(record.as_encoded());
    }
    let vfs = builder.build().unwrap();

    let mut body = String::new();
    vfs.open("/css/vendor/reset.css")
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    assert_eq!(body, "* { box-sizing: border-box }");

    assert_eq!(
        vfs.open("/quote\"d name.txt").unwrap().content(),
        &[0u8, 159, 146, 150]
    );

    let index = vfs.open("/index.html").unwrap();
    assert_eq!(index.stat().modified().timestamp(), 1_600_000_000);

    let root: Vec<_> = vfs
        .open("/")
        .unwrap()
        .readdir(-1)
        .unwrap()
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(root, vec!["css", "empty", "index.html", "quote\"d name.txt"]);

    assert!(vfs.open("/empty").unwrap().readdir(-1).unwrap().unwrap().is_empty());
}

/// Walk order puts parents first, so even incremental `add` links everything
#[test]
fn test_generated_order_is_parent_first() {
    let temp = sample_tree();
    let records = parse_records(&generate(temp.path()));

    let mut vfs = FileSystem::new();
    for record in &records {
        vfs.add(record.as_encoded()).unwrap();
    }
    assert_eq!(vfs.walk().len(), records.len());
}

#[test]
fn test_generation_is_deterministic() {
    let temp = sample_tree();
    assert_eq!(generate(temp.path()), generate(temp.path()));
}

#[test]
fn test_snapshot_matches_generated_filesystem() {
    let temp = sample_tree();
    let direct = Snapshot::capture(temp.path())
        .unwrap()
        .to_filesystem()
        .unwrap();

    let mut builder = FileSystemBuilder::new();
    for record in &parse_records(&generate(temp.path())) {
        builder.add(record.as_encoded());
    }
    let generated = builder.build().unwrap();

    assert_eq!(direct.paths(), generated.paths());
    for path in direct.paths() {
        assert_eq!(direct.get(path), generated.get(path), "{path}");
    }
}

const LOADER_FIXTURE: &str = include_str!("../../binfs/tests/fixtures/loader.rs");

fn fixture_record(path: &str, mode: u32, offset: i32, raw: &[u8], content: &str) -> OwnedEncodedEntry {
    let modified = DateTime::from_timestamp(1_600_000_000, 0)
        .unwrap()
        .with_timezone(&FixedOffset::east_opt(offset).unwrap());
    assert_eq!(codec::content::decode(content).unwrap(), raw);
    OwnedEncodedEntry {
        path: path.to_string(),
        name: binfs::path::base_name(path).to_string(),
        size: raw.len() as u64,
        mode,
        mod_time: codec::time::encode(&modified).unwrap(),
        is_dir: content.is_empty(),
        content: content.to_string(),
    }
}

/// Lines with indentation and blank lines removed
fn significant_lines(source: &str) -> Vec<&str> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Regenerating the fixed records reproduces the checked-in loader
#[test]
fn test_generated_loader_matches_fixture() {
    let records = vec![
        fixture_record("/", 0o40755, 0, b"", ""),
        fixture_record(
            "/a.txt",
            0o100_644,
            0,
            b"hello\n",
            "1f8b0800000000000203cb48cdc9c9e7020020303a3606000000",
        ),
        fixture_record("/sub", 0o40755, 0, b"", ""),
        fixture_record(
            "/sub/b.txt",
            0o100_600,
            2 * 3600,
            b"nested",
            "1f8b0800000000000203cb4b2d2e494d0100e9c2c9aa06000000",
        ),
    ];

    let source = Generator::new(GeneratorConfig::default())
        .unwrap()
        .generate_records("fixture", &records)
        .unwrap();

    assert_eq!(
        significant_lines(&source),
        significant_lines(LOADER_FIXTURE),
        "loader fixture is stale, regenerated source:\n{source}"
    );
}
