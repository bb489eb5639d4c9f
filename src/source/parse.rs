use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_semantic::{Semantic, SemanticBuilder};
use oxc_span::SourceType;
use std::path::Path;
use tracing::debug;

/// Parse output for one file; borrows the worker's allocator and source text
pub struct ParsedUnit<'a> {
  pub program: Program<'a>,
  pub parse_errors: usize,
}

/// Parse a source file
///
/// The parser is error-recovering: a file with syntax errors still yields a
/// partial AST, and the error count is carried so callers can report it.
pub fn parse_source<'a>(allocator: &'a Allocator, path: &Path, source: &'a str) -> ParsedUnit<'a> {
  let source_type =
    SourceType::from_path(path).unwrap_or_else(|_| SourceType::default().with_typescript(true));

  let parser = Parser::new(allocator, source, source_type);
  let parse_result = parser.parse();

  if !parse_result.errors.is_empty() {
    debug!(
      "Parse errors in {:?}: {} errors",
      path,
      parse_result.errors.len()
    );
    // Continue anyway - partial AST may still be useful
  }

  ParsedUnit {
    parse_errors: parse_result.errors.len(),
    program: parse_result.program,
  }
}

/// Build semantic data (scopes, symbols, node table) for a parsed program
pub fn build_semantic<'a>(path: &Path, program: &'a Program<'a>) -> Semantic<'a> {
  let semantic_builder = SemanticBuilder::new()
    .with_cfg(true)
    .with_check_syntax_error(false);

  let semantic_ret = semantic_builder.build(program);

  if !semantic_ret.errors.is_empty() {
    debug!(
      "Semantic errors in {:?}: {} errors",
      path,
      semantic_ret.errors.len()
    );
  }

  semantic_ret.semantic
}
