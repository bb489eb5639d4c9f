pub mod extract;
pub mod model;
pub mod parse;
pub mod react;

pub use extract::extract_file;
pub use model::*;
pub use parse::{build_semantic, parse_source, ParsedUnit};

use crate::utils;
use oxc_semantic::Semantic;
use oxc_span::Span;
use std::path::Path;

/// Per-file view handed to extraction and AST rules
///
/// Borrows from the worker-owned parse artifacts; never outlives them.
pub struct FileContext<'a> {
  pub file_path: &'a Path,
  pub source: &'a str,
  pub semantic: &'a Semantic<'a>,
  pub imports: &'a [model::Import],
}

impl<'a> FileContext<'a> {
  pub fn line_col(&self, offset: u32) -> (u32, u32) {
    utils::offset_to_line_col(self.source, offset as usize)
  }

  pub fn location(&self, span: Span) -> model::Location {
    let (line, column) = self.line_col(span.start);
    model::Location {
      file_path: self.file_path.to_path_buf(),
      line,
      column,
      component: None,
    }
  }

  /// Source text covered by a span
  pub fn text(&self, span: Span) -> &'a str {
    &self.source[span.start as usize..span.end as usize]
  }
}
