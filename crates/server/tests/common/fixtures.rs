//! Shared fixture data: a complete zlib package and a zmqpp recipe.

use super::server::TestServer;

#[allow(dead_code)]
pub const ZLIB_PKG: &str = "zlib/1.2.11/_/_";

#[allow(dead_code)]
pub const ZLIB_BIN_HASH: &str = "6af9cc7cb931c5ad942174fd7838eb655717c709";

/// A realistic conaninfo.txt for a zlib binary.
#[allow(dead_code)]
pub const CONANINFO: &str = "\
[settings]
    arch=x86_64
    build_type=Release
    compiler=gcc
    compiler.libcxx=libstdc++
    compiler.version=9
    os=Linux
[requires]
[options]
    fPIC=True
    shared=False
[full_settings]
    arch=x86_64
    build_type=Release
    compiler=gcc
    compiler.libcxx=libstdc++
    compiler.version=9
    os=Linux
[full_requires]
[full_options]
    fPIC=True
    shared=False
[recipe_hash]
    cb005523f87beefc615e1ff49724883e
[env]
";

/// Seed the seven files of a complete zlib package: four recipe files and
/// one binary with its three files.
#[allow(dead_code)]
pub async fn seed_zlib(server: &TestServer) {
    for name in [
        "conanmanifest.txt",
        "conan_export.tgz",
        "conanfile.py",
        "conan_sources.tgz",
    ] {
        server
            .seed(&format!("{ZLIB_PKG}/0/export/{name}"), b"recipe data")
            .await;
    }
    server
        .seed(
            &format!("{ZLIB_PKG}/0/package/{ZLIB_BIN_HASH}/0/conanmanifest.txt"),
            b"manifest data",
        )
        .await;
    server
        .seed(
            &format!("{ZLIB_PKG}/0/package/{ZLIB_BIN_HASH}/0/conaninfo.txt"),
            CONANINFO.as_bytes(),
        )
        .await;
    server
        .seed(
            &format!("{ZLIB_PKG}/0/package/{ZLIB_BIN_HASH}/0/conan_package.tgz"),
            b"package data",
        )
        .await;
}

/// Seed a zmqpp recipe missing its sources archive.
#[allow(dead_code)]
pub async fn seed_zmqpp_recipe(server: &TestServer) {
    for name in ["conanmanifest.txt", "conan_export.tgz", "conanfile.py"] {
        server
            .seed(&format!("zmqpp/4.2.0/_/_/0/export/{name}"), b"recipe data")
            .await;
    }
}
