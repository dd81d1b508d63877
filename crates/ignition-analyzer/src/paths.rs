//! Mapping between source paths and served (browser-loadable) paths.

use std::path::{Component, Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;

/// Characters escaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode each segment of a `/`-separated served path and join them
/// below `prefix`. Empty segments are dropped.
pub fn url_path(prefix: &str, served: &str) -> String {
    let mut url = prefix.trim_end_matches('/').to_string();
    for segment in served.split('/').filter(|s| !s.is_empty()) {
        url.push('/');
        url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
    }
    url
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// TypeScript extension -> emitted extension.
fn emitted_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "ts" | "tsx" => Some("js"),
        "mts" => Some("mjs"),
        "cts" => Some("cjs"),
        _ => None,
    }
}

/// Emitted extension -> TypeScript extensions that may have produced it.
fn source_extensions(ext: &str) -> &'static [&'static str] {
    match ext {
        "js" => &["ts", "tsx"],
        "mjs" => &["mts"],
        "cjs" => &["cts"],
        _ => &[],
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    #[serde(default)]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    root_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
}

/// Computes the served path ("jsPath") of a source file and its inverse.
///
/// Without a `tsconfig.json` the mapping only swaps TypeScript extensions for
/// their JavaScript counterparts. With `compilerOptions.rootDir` and
/// `compilerOptions.outDir` set, sources under `rootDir` are served from the
/// matching location under `outDir`, which is where `tsc` would write them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsPathMapper {
    /// `(rootDir, outDir)`, both relative to the workspace root.
    ts_dirs: Option<(PathBuf, PathBuf)>,
}

impl JsPathMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapper from the contents of a `tsconfig.json`.
    pub fn from_tsconfig(content: &str) -> Result<Self, serde_json::Error> {
        let config: TsConfig = serde_json::from_str(content)?;
        let CompilerOptions { root_dir, out_dir } = config.compiler_options;

        Ok(Self {
            ts_dirs: root_dir
                .zip(out_dir)
                .map(|(root, out)| (normalize(&root), normalize(&out))),
        })
    }

    /// Served path for a root-relative source path.
    pub fn js_path(&self, source: &Path) -> String {
        let Some(emitted) = source
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(emitted_extension)
        else {
            return to_slash(source);
        };

        let mut served = match &self.ts_dirs {
            Some((root_dir, out_dir)) => match source.strip_prefix(root_dir) {
                Ok(rest) => out_dir.join(rest),
                Err(_) => source.to_path_buf(),
            },
            None => source.to_path_buf(),
        };
        served.set_extension(emitted);
        to_slash(&served)
    }

    /// Root-relative candidates for the source of a served path, most specific first.
    pub fn source_candidates(&self, served: &str) -> Vec<PathBuf> {
        let served = PathBuf::from(served);
        let mut bases = vec![served.clone()];
        if let Some((root_dir, out_dir)) = &self.ts_dirs {
            if let Ok(rest) = served.strip_prefix(out_dir) {
                bases.push(root_dir.join(rest));
            }
        }

        let extensions = served
            .extension()
            .and_then(|ext| ext.to_str())
            .map(source_extensions)
            .unwrap_or_default();

        let mut candidates = vec![served.clone()];
        for base in &bases {
            for ext in extensions {
                let candidate = base.with_extension(ext);
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }
}

/// `./src/` -> `src`, `.` -> empty.
fn normalize(path: &Path) -> PathBuf {
    let cleaned = path_clean::clean(path);
    if cleaned == Path::new(".") {
        PathBuf::new()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_typescript_extensions() {
        let mapper = JsPathMapper::new();
        assert_eq!(mapper.js_path(Path::new("src/my-element.ts")), "src/my-element.js");
        assert_eq!(mapper.js_path(Path::new("src/view.tsx")), "src/view.js");
        assert_eq!(mapper.js_path(Path::new("lib/a.mts")), "lib/a.mjs");
        assert_eq!(mapper.js_path(Path::new("lib/a.cts")), "lib/a.cjs");
    }

    #[test]
    fn keeps_javascript_paths() {
        let mapper = JsPathMapper::new();
        assert_eq!(mapper.js_path(Path::new("components/foo.js")), "components/foo.js");
        assert_eq!(mapper.js_path(Path::new("styles/site.css")), "styles/site.css");
    }

    #[test]
    fn maps_root_dir_to_out_dir() {
        let mapper = JsPathMapper::from_tsconfig(
            r#"{ "compilerOptions": { "rootDir": "./src", "outDir": "./lib/" } }"#,
        )
        .unwrap();

        assert_eq!(mapper.js_path(Path::new("src/els/x-foo.ts")), "lib/els/x-foo.js");
        // outside rootDir: extension swap only
        assert_eq!(mapper.js_path(Path::new("test/x-foo.test.ts")), "test/x-foo.test.js");
    }

    #[test]
    fn out_dir_without_root_dir_is_ignored() {
        let mapper =
            JsPathMapper::from_tsconfig(r#"{ "compilerOptions": { "outDir": "lib" } }"#).unwrap();
        assert_eq!(mapper, JsPathMapper::new());
    }

    #[test]
    fn dot_root_dir_maps_everything() {
        let mapper = JsPathMapper::from_tsconfig(
            r#"{ "compilerOptions": { "rootDir": ".", "outDir": "build" } }"#,
        )
        .unwrap();
        assert_eq!(mapper.js_path(Path::new("src/a.ts")), "build/src/a.js");
    }

    #[test]
    fn source_candidates_invert_the_mapping() {
        let mapper = JsPathMapper::from_tsconfig(
            r#"{ "compilerOptions": { "rootDir": "src", "outDir": "lib" } }"#,
        )
        .unwrap();

        let candidates = mapper.source_candidates("lib/x-foo.js");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("lib/x-foo.js"),
                PathBuf::from("lib/x-foo.ts"),
                PathBuf::from("lib/x-foo.tsx"),
                PathBuf::from("src/x-foo.ts"),
                PathBuf::from("src/x-foo.tsx"),
            ]
        );
    }

    #[test]
    fn non_script_has_single_candidate() {
        let mapper = JsPathMapper::new();
        assert_eq!(
            mapper.source_candidates("assets/logo.svg"),
            vec![PathBuf::from("assets/logo.svg")]
        );
    }

    #[test]
    fn invalid_tsconfig_is_an_error() {
        assert!(JsPathMapper::from_tsconfig("{ // comment\n }").is_err());
    }

    #[test]
    fn url_path_encodes_segments() {
        assert_eq!(url_path("/_src", "src/a#1.js"), "/_src/src/a%231.js");
        assert_eq!(url_path("/_src/", "src/my element?.js"), "/_src/src/my%20element%3F.js");
        assert_eq!(url_path("/_src", "src/100%.js"), "/_src/src/100%25.js");
        assert_eq!(url_path("/_src", "src//a.js"), "/_src/src/a.js");
    }

    #[test]
    fn to_slash_drops_current_dir() {
        assert_eq!(to_slash(Path::new("./src/a.js")), "src/a.js");
    }
}
