use std::path::Path;

/// Extensions considered as source files (analyzed by the Oxc parser)
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Check if a file is a source file (TypeScript/JavaScript)
pub fn is_source_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
    .unwrap_or(false)
}

/// Check whether a name follows the PascalCase component convention
pub fn is_pascal_case(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if first.is_ascii_uppercase() => {
      chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
    _ => false,
  }
}

/// Check whether a callee name follows the `useXxx` hook convention
pub fn is_hook_name(name: &str) -> bool {
  let rest = match name.strip_prefix("use") {
    Some(rest) => rest,
    None => return false,
  };
  rest.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Convert byte offset to line and column
/// Returns line (1-indexed) and column (0-indexed), per the diagnostic contract
pub fn offset_to_line_col(source: &str, offset: usize) -> (u32, u32) {
  let mut line: u32 = 1;
  let mut col: u32 = 0;
  let mut current_offset = 0;

  for ch in source.chars() {
    if current_offset >= offset {
      break;
    }

    if ch == '\n' {
      line += 1;
      col = 0;
    } else {
      col += 1;
    }

    current_offset += ch.len_utf8();
  }

  (line, col)
}

/// Module base name used as the fallback component name for anonymous
/// default exports ("index" falls through to the directory name)
pub fn module_base_name(path: &Path) -> String {
  let stem = path
    .file_stem()
    .and_then(|s| s.to_str())
    .unwrap_or("Component");

  if stem != "index" {
    return stem.to_string();
  }

  path
    .parent()
    .and_then(|p| p.file_name())
    .and_then(|s| s.to_str())
    .unwrap_or(stem)
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_source_file() {
    assert!(is_source_file(Path::new("index.ts")));
    assert!(is_source_file(Path::new("component.tsx")));
    assert!(is_source_file(Path::new("utils.js")));
    assert!(is_source_file(Path::new("app.jsx")));
    assert!(is_source_file(Path::new("path/to/file.ts")));

    assert!(!is_source_file(Path::new("styles.css")));
    assert!(!is_source_file(Path::new("config.json")));
    assert!(!is_source_file(Path::new("no-extension")));
  }

  #[test]
  fn test_is_pascal_case() {
    assert!(is_pascal_case("App"));
    assert!(is_pascal_case("UserProfile"));
    assert!(is_pascal_case("Grid2"));

    assert!(!is_pascal_case("useTheme"));
    assert!(!is_pascal_case("div"));
    assert!(!is_pascal_case("_Private"));
    assert!(!is_pascal_case(""));
  }

  #[test]
  fn test_is_hook_name() {
    assert!(is_hook_name("useState"));
    assert!(is_hook_name("useMyCustomThing"));

    assert!(!is_hook_name("use"));
    assert!(!is_hook_name("user"));
    assert!(!is_hook_name("username"));
    assert!(!is_hook_name("Use"));
    assert!(!is_hook_name("setState"));
  }

  #[test]
  fn test_offset_to_line_col() {
    let source = "line1\nline2\nline3\n";
    assert_eq!(offset_to_line_col(source, 0), (1, 0));
    assert_eq!(offset_to_line_col(source, 5), (1, 5));
    assert_eq!(offset_to_line_col(source, 6), (2, 0));
    assert_eq!(offset_to_line_col(source, 12), (3, 0));
  }

  #[test]
  fn test_module_base_name() {
    assert_eq!(module_base_name(Path::new("src/Dashboard.tsx")), "Dashboard");
    assert_eq!(module_base_name(Path::new("src/Sidebar/index.tsx")), "Sidebar");
  }
}
