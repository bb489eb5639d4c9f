//! Module resolver
//!
//! Owns the per-file import/export tables and binds import specifiers to
//! absolute source paths. Resolution applies the configured path aliases and
//! base URL first, then falls back to `oxc_resolver` and a plain
//! extension/index ladder for relative specifiers. Results (including
//! failures) are memoized in a concurrent map; inserts are idempotent, so
//! readers racing a writer always observe the same resolution.

use crate::config::CompilerOptions;
use crate::source::model::{Export, FileAnalysis, Import};
use dashmap::DashMap;
use oxc_resolver::{ResolveOptions, Resolver, TsconfigDiscovery, TsconfigOptions, TsconfigReferences};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension/index ladder tried against the filesystem, in order
const RESOLUTION_LADDER: &[&str] = &[
  ".ts",
  ".tsx",
  ".js",
  ".jsx",
  "/index.ts",
  "/index.tsx",
  "/index.js",
  "/index.jsx",
];

pub struct ModuleResolver {
  project_root: PathBuf,
  base_url: PathBuf,
  /// (pattern, targets) pairs from compilerOptions.paths; `*` globs supported
  aliases: Vec<(String, Vec<String>)>,
  resolver: Resolver,
  /// (from_file, specifier) -> resolved absolute path, None for unresolved
  cache: DashMap<(PathBuf, String), Option<PathBuf>>,
  imports: FxHashMap<PathBuf, Vec<Import>>,
  exports: FxHashMap<PathBuf, Vec<Export>>,
}

impl ModuleResolver {
  pub fn new(
    project_root: &Path,
    compiler_options: &CompilerOptions,
    analyses: &[FileAnalysis],
  ) -> Self {
    let mut imports = FxHashMap::default();
    let mut exports = FxHashMap::default();
    for analysis in analyses {
      imports.insert(analysis.file_path.clone(), analysis.imports.clone());
      exports.insert(analysis.file_path.clone(), analysis.exports.clone());
    }

    let tsconfig_path = project_root.join("tsconfig.json");
    let options = ResolveOptions {
      extensions: vec![
        ".ts".into(),
        ".tsx".into(),
        ".js".into(),
        ".jsx".into(),
        ".d.ts".into(),
      ],
      tsconfig: if tsconfig_path.exists() {
        Some(TsconfigDiscovery::Manual(TsconfigOptions {
          config_file: tsconfig_path.clone(),
          references: TsconfigReferences::Auto,
        }))
      } else {
        None
      },
      ..Default::default()
    };

    let base_url = project_root.join(&compiler_options.base_url);
    let aliases = compiler_options
      .paths
      .iter()
      .map(|(pattern, targets)| (pattern.clone(), targets.clone()))
      .collect();

    Self {
      project_root: project_root.to_path_buf(),
      base_url,
      aliases,
      resolver: Resolver::new(options),
      cache: DashMap::new(),
      imports,
      exports,
    }
  }

  pub fn project_root(&self) -> &Path {
    &self.project_root
  }

  pub fn imports_of(&self, file: &Path) -> &[Import] {
    self.imports.get(file).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn exports_of(&self, file: &Path) -> &[Export] {
    self.exports.get(file).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Resolve an import specifier to an absolute source path (with caching)
  pub fn resolve_import(&self, from_file: &Path, specifier: &str) -> Option<PathBuf> {
    let cache_key = (from_file.to_path_buf(), specifier.to_string());

    if let Some(cached) = self.cache.get(&cache_key) {
      return cached.clone();
    }

    let resolved = self.resolve_uncached(from_file, specifier);
    // Idempotent: a racing writer computes the same value
    self.cache.insert(cache_key, resolved.clone());
    resolved
  }

  fn resolve_uncached(&self, from_file: &Path, specifier: &str) -> Option<PathBuf> {
    // 1. Configured aliases, in declaration order
    for target in self.alias_targets(specifier) {
      if let Some(resolved) = self.ladder_resolve(&target) {
        return Some(resolved);
      }
    }

    let context = from_file.parent()?;

    // 2. Relative specifiers: plain ladder against the importing directory
    if specifier.starts_with('.') {
      let base = context.join(specifier);
      if let Some(resolved) = self.ladder_resolve(&base) {
        return Some(resolved);
      }
    } else {
      // 3. Bare specifiers against the base URL (tsconfig baseUrl semantics)
      let base = self.base_url.join(specifier);
      if let Some(resolved) = self.ladder_resolve(&base) {
        return Some(resolved);
      }
    }

    // 4. Full resolver (node_modules, tsconfig paths, package.json exports)
    match self.resolver.resolve(context, specifier) {
      Ok(resolution) => Some(resolution.path().to_path_buf()),
      Err(_) => {
        debug!(
          "Unresolved specifier '{}' from {:?}",
          specifier, from_file
        );
        None
      }
    }
  }

  /// Absolute candidate paths produced by the alias map for a specifier
  fn alias_targets(&self, specifier: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for (pattern, targets) in &self.aliases {
      match pattern.split_once('*') {
        Some((prefix, suffix)) => {
          if specifier.len() >= prefix.len() + suffix.len()
            && specifier.starts_with(prefix)
            && specifier.ends_with(suffix)
          {
            let middle = &specifier[prefix.len()..specifier.len() - suffix.len()];
            for target in targets {
              candidates.push(self.base_url.join(target.replacen('*', middle, 1)));
            }
          }
        }
        None => {
          if specifier == pattern {
            for target in targets {
              candidates.push(self.base_url.join(target));
            }
          }
        }
      }
    }

    candidates
  }

  /// Try a path as-is, then with appended extensions, then as a directory
  /// with index files. Extensions are appended rather than substituted, so
  /// `colors.css` can resolve to `colors.css.ts`.
  fn ladder_resolve(&self, base: &Path) -> Option<PathBuf> {
    if base.is_file() && crate::utils::is_source_file(base) {
      return Some(normalize(base));
    }

    for ext in RESOLUTION_LADDER {
      let candidate = if let Some(rest) = ext.strip_prefix('/') {
        base.join(rest)
      } else {
        PathBuf::from(format!("{}{}", base.display(), ext))
      };
      if candidate.is_file() {
        return Some(normalize(&candidate));
      }
    }

    None
  }
}

/// Collapse `.` and `..` segments without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      std::path::Component::CurDir => {}
      std::path::Component::ParentDir => {
        normalized.pop();
      }
      other => normalized.push(other),
    }
  }
  normalized
}
