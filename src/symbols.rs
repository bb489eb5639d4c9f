//! Symbol table
//!
//! Complements the module resolver with semantic attributes per binding:
//! which bindings are components, which are memoized, which are module-level
//! constants or context objects. Cross-file stability and memoization queries
//! go through here so they never re-parse a file.

use crate::resolver::ModuleResolver;
use crate::source::model::{ComponentKind, DefaultExport, Export, FileAnalysis};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSymbol {
  pub kind: ComponentKind,
  pub memoized: bool,
  pub default_export: bool,
}

#[derive(Debug, Default)]
struct FileSymbols {
  components: FxHashMap<String, ComponentSymbol>,
  contexts: FxHashSet<String>,
  constants: FxHashSet<String>,
  exports: Vec<Export>,
  default_export: Option<DefaultExport>,
}

/// Per-project symbol table, built once from the extracted file analyses
#[derive(Debug, Default)]
pub struct SymbolTable {
  files: FxHashMap<PathBuf, FileSymbols>,
}

impl SymbolTable {
  pub fn build(analyses: &[FileAnalysis]) -> Self {
    let mut files = FxHashMap::default();

    for analysis in analyses {
      let mut symbols = FileSymbols {
        exports: analysis.exports.clone(),
        default_export: analysis.default_export.clone(),
        ..Default::default()
      };

      for component in &analysis.components {
        symbols.components.insert(
          component.name.clone(),
          ComponentSymbol {
            kind: component.kind,
            memoized: component.memoized,
            default_export: component.default_export,
          },
        );
      }
      for context in &analysis.contexts {
        symbols.contexts.insert(context.name.clone());
      }
      symbols.constants = analysis.module_constants.iter().cloned().collect();

      files.insert(analysis.file_path.clone(), symbols);
    }

    Self { files }
  }

  pub fn component(&self, file: &Path, name: &str) -> Option<ComponentSymbol> {
    self.files.get(file)?.components.get(name).copied()
  }

  /// Module-scope `const` binding in the given file
  pub fn is_constant(&self, file: &Path, name: &str) -> bool {
    self
      .files
      .get(file)
      .is_some_and(|symbols| symbols.constants.contains(name))
  }

  pub fn has_context(&self, file: &Path, name: &str) -> bool {
    self
      .files
      .get(file)
      .is_some_and(|symbols| symbols.contexts.contains(name))
  }

  /// Resolve an exported name in a file to the component binding it denotes,
  /// following `as` aliases, default exports, and re-export chains.
  ///
  /// `name` may be "default". Cycles through barrel files are broken with a
  /// visited set; unresolvable names yield None, never an error.
  pub fn resolve_component(
    &self,
    resolver: &ModuleResolver,
    file: &Path,
    name: &str,
  ) -> Option<(PathBuf, String)> {
    let mut visited = FxHashSet::default();
    self.resolve_component_inner(resolver, file, name, &mut visited)
  }

  fn resolve_component_inner(
    &self,
    resolver: &ModuleResolver,
    file: &Path,
    name: &str,
    visited: &mut FxHashSet<(PathBuf, String)>,
  ) -> Option<(PathBuf, String)> {
    if !visited.insert((file.to_path_buf(), name.to_string())) {
      return None;
    }

    let symbols = self.files.get(file)?;

    if name == "default" {
      if let Some(default) = &symbols.default_export {
        if let Some(local) = &default.local_name {
          if symbols.components.contains_key(local) {
            return Some((file.to_path_buf(), local.clone()));
          }
        }
      }
      // Anonymous default components carry the flag themselves
      if let Some(component_name) = symbols
        .components
        .iter()
        .find(|(_, symbol)| symbol.default_export)
        .map(|(component_name, _)| component_name.clone())
      {
        return Some((file.to_path_buf(), component_name));
      }
    } else if symbols.components.contains_key(name) {
      return Some((file.to_path_buf(), name.to_string()));
    }

    // Named exports: aliases and re-exports
    for export in &symbols.exports {
      if export.exported_name != name {
        continue;
      }
      let inner_name = export.local_name.as_deref().unwrap_or(name);
      if let Some(from) = &export.re_export_from {
        if let Some(target) = resolver.resolve_import(file, from) {
          if let Some(found) = self.resolve_component_inner(resolver, &target, inner_name, visited)
          {
            return Some(found);
          }
        }
      } else if symbols.components.contains_key(inner_name) {
        return Some((file.to_path_buf(), inner_name.to_string()));
      }
    }

    // Wildcard re-exports: export * from '...'
    for export in &symbols.exports {
      if export.exported_name != "*" {
        continue;
      }
      if let Some(from) = &export.re_export_from {
        if let Some(target) = resolver.resolve_import(file, from) {
          if let Some(found) = self.resolve_component_inner(resolver, &target, name, visited) {
            return Some(found);
          }
        }
      }
    }

    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::model::{ComponentInfo, Location};
  use std::collections::BTreeSet;

  fn component(name: &str, memoized: bool, default_export: bool) -> ComponentInfo {
    ComponentInfo {
      name: name.to_string(),
      kind: ComponentKind::FunctionDeclaration,
      memoized,
      exported: true,
      default_export,
      props: Vec::new(),
      props_param: None,
      rest_prop: None,
      props_used_locally: BTreeSet::new(),
      hooks: Vec::new(),
      jsx: Vec::new(),
      setter_calls: Vec::new(),
      wraps: None,
      location: Location {
        file_path: PathBuf::from("/p/a.tsx"),
        line: 1,
        column: 0,
        component: Some(name.to_string()),
      },
      span: (0, 0),
    }
  }

  #[test]
  fn test_component_lookup_and_memo_flag() {
    let analysis = FileAnalysis {
      file_path: PathBuf::from("/p/a.tsx"),
      components: vec![component("Card", true, false)],
      ..Default::default()
    };
    let table = SymbolTable::build(&[analysis]);

    let symbol = table.component(Path::new("/p/a.tsx"), "Card").unwrap();
    assert!(symbol.memoized);
    assert!(table.component(Path::new("/p/a.tsx"), "Missing").is_none());
  }

  #[test]
  fn test_constants_recorded() {
    let mut constants = BTreeSet::new();
    constants.insert("COLUMNS".to_string());
    let analysis = FileAnalysis {
      file_path: PathBuf::from("/p/a.tsx"),
      module_constants: constants,
      ..Default::default()
    };
    let table = SymbolTable::build(&[analysis]);

    assert!(table.is_constant(Path::new("/p/a.tsx"), "COLUMNS"));
    assert!(!table.is_constant(Path::new("/p/a.tsx"), "other"));
  }
}
