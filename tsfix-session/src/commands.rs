//! Build and type-check commands derived from the affected area and the project's manifest.

use crate::area::Area;
use camino::Utf8Path;
use fs_err as fs;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    /// Detect from the lockfile in `project_dir`; npm when none is present.
    pub fn detect(project_dir: &Utf8Path) -> Self {
        if project_dir.join("pnpm-lock.yaml").is_file() {
            PackageManager::Pnpm
        } else if project_dir.join("yarn.lock").is_file() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn run(self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {script}"),
            PackageManager::Pnpm => format!("pnpm run {script}"),
            PackageManager::Yarn => format!("yarn run {script}"),
        }
    }

    pub fn exec(self, bin: &str) -> String {
        match self {
            PackageManager::Npm => format!("npx {bin}"),
            PackageManager::Pnpm => format!("pnpm exec {bin}"),
            PackageManager::Yarn => format!("yarn {bin}"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

fn scripts(project_dir: &Utf8Path) -> BTreeMap<String, String> {
    let path = project_dir.join("package.json");
    let Ok(text) = fs::read_to_string(&path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str::<PackageJson>(&text) {
        Ok(pkg) => pkg.scripts,
        Err(err) => {
            warn!(path = %path, error = %err, "ignoring unreadable package.json");
            BTreeMap::new()
        }
    }
}

fn preferred_scripts(area: Area) -> &'static [&'static str] {
    match area {
        Area::Source | Area::Components | Area::Styles | Area::Types => &["build-only", "build"],
        Area::Config => &["type-check", "build"],
        Area::Tests => &["test:e2e", "test"],
        Area::Root => &["build"],
        Area::Assets | Area::Build | Area::Cache | Area::Docs | Area::Tools => &[],
    }
}

/// The script to run after editing a file in `area`, if the manifest defines one.
pub fn build_command(project_dir: &Utf8Path, area: Area) -> Option<String> {
    let wanted = preferred_scripts(area);
    if wanted.is_empty() {
        return None;
    }
    let scripts = scripts(project_dir);
    let script = wanted.iter().find(|s| scripts.contains_key(**s))?;
    Some(PackageManager::detect(project_dir).run(script))
}

/// The type-check command for `area`, depending on which tsconfig the project carries.
pub fn tsc_command(project_dir: &Utf8Path, area: Area) -> Option<String> {
    let app = project_dir.join("tsconfig.app.json").is_file();
    let base = project_dir.join("tsconfig.json").is_file();
    let pm = PackageManager::detect(project_dir);
    match area {
        Area::Source | Area::Components | Area::Types | Area::Config | Area::Root => {
            if app {
                Some(pm.exec("vue-tsc --project tsconfig.app.json --noEmit"))
            } else if base {
                Some(pm.exec("vue-tsc --noEmit"))
            } else {
                None
            }
        }
        Area::Styles | Area::Assets | Area::Tests | Area::Docs | Area::Tools | Area::Cache => None,
        Area::Build => base.then(|| pm.exec("vue-tsc --noEmit")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;

    fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8");
        for (name, body) in files {
            fs::write(root.join(name), body).expect("write");
        }
        (tmp, root)
    }

    #[test]
    fn build_prefers_build_only_for_source() {
        let (_tmp, root) = project(&[
            ("package.json", r#"{"scripts":{"build":"vite build","build-only":"vite build"}}"#),
            ("pnpm-lock.yaml", ""),
        ]);
        assert_eq!(
            build_command(&root, Area::Source).as_deref(),
            Some("pnpm run build-only")
        );
        assert_eq!(build_command(&root, Area::Root).as_deref(), Some("pnpm run build"));
        assert_eq!(build_command(&root, Area::Docs), None);
    }

    #[test]
    fn config_and_tests_fall_back() {
        let (_tmp, root) = project(&[(
            "package.json",
            r#"{"scripts":{"build":"vite build","test":"vitest"}}"#,
        )]);
        assert_eq!(build_command(&root, Area::Config).as_deref(), Some("npm run build"));
        assert_eq!(build_command(&root, Area::Tests).as_deref(), Some("npm run test"));
    }

    #[test]
    fn missing_or_broken_manifest_yields_nothing() {
        let (_tmp, root) = project(&[]);
        assert_eq!(build_command(&root, Area::Source), None);
        let (_tmp, root) = project(&[("package.json", "{not json")]);
        assert_eq!(build_command(&root, Area::Source), None);
    }

    #[test]
    fn tsc_depends_on_tsconfig() {
        let (_tmp, root) = project(&[("tsconfig.json", "{}"), ("tsconfig.app.json", "{}")]);
        assert_eq!(
            tsc_command(&root, Area::Source).as_deref(),
            Some("npx vue-tsc --project tsconfig.app.json --noEmit")
        );
        assert_eq!(
            tsc_command(&root, Area::Build).as_deref(),
            Some("npx vue-tsc --noEmit")
        );
        assert_eq!(tsc_command(&root, Area::Styles), None);

        let (_tmp, root) = project(&[("tsconfig.json", "{}"), ("yarn.lock", "")]);
        assert_eq!(
            tsc_command(&root, Area::Types).as_deref(),
            Some("yarn vue-tsc --noEmit")
        );

        let (_tmp, root) = project(&[]);
        assert_eq!(tsc_command(&root, Area::Source), None);
    }
}
