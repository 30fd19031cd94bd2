//! Canonical file sets of the Conan storage layout.

/// Manifest file storing the list of package files with their hashes.
pub const CONAN_MANIFEST: &str = "conanmanifest.txt";

/// Build-configuration description of a package binary.
pub const CONAN_INFO: &str = "conaninfo.txt";

/// Files every valid recipe revision carries under its `export/` directory.
pub const PKG_SRC_LIST: &[&str] = &[
    CONAN_MANIFEST,
    "conan_export.tgz",
    "conanfile.py",
    "conan_sources.tgz",
];

/// Files every valid binary revision carries.
pub const PKG_BIN_LIST: &[&str] = &[CONAN_MANIFEST, CONAN_INFO, "conan_package.tgz"];

/// Recipe sources subdirectory name.
pub const SRC_SUBDIR: &str = "export";

/// Package binaries subdirectory name.
pub const BIN_SUBDIR: &str = "package";

/// Revisions index file name.
pub const INDEX_FILE: &str = "revisions.txt";
