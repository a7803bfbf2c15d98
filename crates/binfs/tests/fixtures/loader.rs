// Code generated by binfs from "fixture". DO NOT EDIT.

/// Rebuilds the embedded filesystem: 4 entries, 12 bytes of content.
///
/// # Errors
///
/// Returns an error if the embedded data is corrupt.
#[allow(clippy::unreadable_literal, clippy::too_many_lines)]
pub fn load() -> binfs::Result<binfs::FileSystem> {
    let mut builder = binfs::FileSystemBuilder::new();
    builder.add(binfs::EncodedEntry {
        path: "/",
        name: ".",
        size: 0,
        mode: 0o40755,
        mod_time: "010000000ed6f0070000000000ffff",
        is_dir: true,
        content: "",
    });
    builder.add(binfs::EncodedEntry {
        path: "/a.txt",
        name: "a.txt",
        size: 6,
        mode: 0o100644,
        mod_time: "010000000ed6f0070000000000ffff",
        is_dir: false,
        content: "1f8b0800000000000203cb48cdc9c9e7020020303a3606000000",
    });
    builder.add(binfs::EncodedEntry {
        path: "/sub",
        name: "sub",
        size: 0,
        mode: 0o40755,
        mod_time: "010000000ed6f0070000000000ffff",
        is_dir: true,
        content: "",
    });
    builder.add(binfs::EncodedEntry {
        path: "/sub/b.txt",
        name: "b.txt",
        size: 6,
        mode: 0o100600,
        mod_time: "010000000ed6f00700000000000078",
        is_dir: false,
        content: "1f8b0800000000000203cb4b2d2e494d0100e9c2c9aa06000000",
    });
    builder.build()
}
