//! Shared helpers for the integration suite.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway project directory holding a catalog file, with a runner for
/// the compiled `pagegen` binary.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("create temp project dir") }
    }

    /// Write a catalog file and return its path.
    pub fn write_catalog(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("catalog.toml");
        std::fs::write(&path, content).expect("write catalog file");
        path
    }

    /// Write a site config file and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("pagegen.toml");
        std::fs::write(&path, content).expect("write config file");
        path
    }

    /// A `pagegen` invocation rooted in this project, progress disabled.
    pub fn pagegen(&self) -> Command {
        let mut cmd = Command::cargo_bin("pagegen").expect("pagegen binary");
        cmd.current_dir(self.dir.path());
        cmd.env("PAGEGEN_NO_PROGRESS", "1");
        cmd.env_remove("PAGEGEN_CONFIG_PATH");
        cmd.env_remove("PAGEGEN_CATALOG_PATH");
        cmd
    }
}

/// A small two-family catalog: LG sells both lines, Tornado only kitchen.
pub const SAMPLE_CATALOG: &str = r#"
[[families]]
name = "Kitchen"
slug = "kitchen"
description = "أجهزة المطبخ المنزلية"

[[families]]
name = "Laundry"
slug = "laundry"
description = "أجهزة غسيل وتجفيف الملابس"

[[brands]]
name = "LG"
slug = "lg"
logo = "brands/lg/logo.webp"

[[brands]]
name = "Tornado"
slug = "tornado"

[[products]]
name = "Refrigerator"
slug = "refrigerator"
family = "kitchen"

[[products]]
name = "Washing Machine"
slug = "washing-machine"
family = "laundry"

[[relations]]
brand = "lg"
family = "kitchen"

[[relations]]
brand = "lg"
family = "laundry"

[[relations]]
brand = "tornado"
family = "kitchen"

[[ratings]]
brand = "lg"
product = "washing-machine"
value = 4.8
count = 214

[[overrides]]
brand = "lg"
product = "washing-machine"
keyword = "maintenance"
section = "intro"
body = "نص مخصص يحل محل مقدمة صيانة LG Washing Machine المولدة."
"#;
