use camino::Utf8Path;
use serde::Serialize;
use std::fmt;

/// Coarse part of a Vue/TypeScript project an edited file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Source,
    Assets,
    Build,
    Cache,
    Docs,
    Tests,
    Tools,
    Styles,
    Types,
    Components,
    Config,
    Root,
}

impl Area {
    pub fn as_str(self) -> &'static str {
        match self {
            Area::Source => "source",
            Area::Assets => "assets",
            Area::Build => "build",
            Area::Cache => "cache",
            Area::Docs => "docs",
            Area::Tests => "tests",
            Area::Tools => "tools",
            Area::Styles => "styles",
            Area::Types => "types",
            Area::Components => "components",
            Area::Config => "config",
            Area::Root => "root",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CONFIG_PREFIXES: &[&str] = &[
    "vite.config.",
    "vue.config.",
    "nuxt.config.",
    "tsconfig.",
    "package.json",
    "pnpm-lock.",
    "yarn.lock",
];

/// Classify `file` (absolute, or relative to `project_dir`). `None` when it lies outside the
/// project.
pub fn classify(project_dir: &Utf8Path, file: &Utf8Path) -> Option<Area> {
    let rel = if file.is_absolute() {
        file.strip_prefix(project_dir).ok()?
    } else {
        file
    };
    let rel = rel.as_str().replace('\\', "/");
    let rel = rel.trim_start_matches("./");
    if rel.is_empty() || rel.starts_with("../") {
        return None;
    }

    let mut parts = rel.split('/').filter(|p| !p.is_empty());
    let first = parts.next()?;
    let nested = parts.next().is_some();

    if !nested {
        return Some(if CONFIG_PREFIXES.iter().any(|p| first.starts_with(p)) {
            Area::Config
        } else {
            Area::Root
        });
    }

    Some(match first {
        "src" => Area::Source,
        "public" => Area::Assets,
        "dist" | "build" => Area::Build,
        ".vite" | ".nuxt" | ".output" => Area::Cache,
        "docs" => Area::Docs,
        "tests" | "test" | "__tests__" | "e2e" => Area::Tests,
        "scripts" | "tools" => Area::Tools,
        "styles" | "css" | "sass" | "scss" => Area::Styles,
        "types" | "@types" => Area::Types,
        "components" | "lib" | "packages" => Area::Components,
        _ => Area::Source,
    })
}
