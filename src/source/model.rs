use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A position in a source file
/// Lines are 1-indexed, columns 0-indexed, per the diagnostic contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
  pub file_path: PathBuf,
  pub line: u32,
  pub column: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub component: Option<String>,
}

/// Import information
#[derive(Debug, Clone)]
pub struct Import {
  /// The imported symbol name (from the source file); "default" and "*" are sentinels
  pub imported_name: String,
  /// The local name (in the importing file)
  pub local_name: String,
  /// The module specifier (e.g., "./utils" or "@/components/Button")
  pub from_module: String,
  /// Whether this is a type-only import
  pub is_type_only: bool,
}

/// Export information
#[derive(Debug, Clone)]
pub struct Export {
  /// The exported symbol name
  pub exported_name: String,
  /// The local name (if different from exported name)
  pub local_name: Option<String>,
  /// If this is a re-export, the module it's re-exported from
  pub re_export_from: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
  FunctionDeclaration,
  ArrowFunction,
  /// `const Memoized = memo(Other)` - a wrapper binding, no body of its own
  MemoWrapper,
}

/// A prop declared on a component, from its parameter pattern or type annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDecl {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub type_text: Option<String>,
  pub required: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default_text: Option<String>,
}

/// Coarse shape of a value, from its initializer or literal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataShape {
  Primitive,
  Object,
  Array,
  Function,
  #[default]
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
  State,
  Reducer,
  Memo,
  Callback,
  Context,
  Effect,
  Ref,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepKind {
  Identifier,
  Inline,
}

/// One entry of a hook dependency array
#[derive(Debug, Clone)]
pub struct DepEntry {
  pub kind: DepKind,
  pub text: String,
  pub location: Location,
}

/// A hook call inside a component body
#[derive(Debug, Clone)]
pub struct HookCall {
  pub kind: HookKind,
  pub callee: String,
  /// Value slot of a `useState`/`useReducer` destructuring
  pub value_name: Option<String>,
  /// Setter/dispatch slot of a `useState`/`useReducer` destructuring
  pub setter_name: Option<String>,
  /// Single binding for `useMemo`/`useCallback`/`useContext`/`useRef`
  pub bound_name: Option<String>,
  /// First-argument text, when statically printable
  pub initial_text: Option<String>,
  pub data_shape: DataShape,
  /// Dependency array entries, when the hook carries one
  pub deps: Option<Vec<DepEntry>>,
  /// Context identifier for `useContext(Ident)`
  pub context_ident: Option<String>,
  pub location: Location,
}

/// Classified value of a JSX attribute expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
  /// Bare attribute (`<Foo enabled />`), implicit boolean true
  Empty,
  StringLiteral(String),
  PrimitiveLiteral(String),
  Identifier(String),
  Member {
    root: String,
    property: String,
    text: String,
  },
  InlineObject,
  InlineArray,
  InlineFunction,
  Call {
    callee: String,
  },
  JsxNode,
  Other(String),
}

#[derive(Debug, Clone)]
pub struct JsxAttr {
  pub name: String,
  pub value: AttrValue,
  pub location: Location,
}

#[derive(Debug, Clone)]
pub enum SpreadExpr {
  Identifier(String),
  Other(String),
}

#[derive(Debug, Clone)]
pub struct JsxSpread {
  pub expr: SpreadExpr,
  pub location: Location,
}

/// A JSX element appearing in a component body
#[derive(Debug, Clone)]
pub struct JsxUsage {
  /// Element name as written: "Child", "div", "Ctx.Provider"
  pub element_name: String,
  pub attributes: Vec<JsxAttr>,
  pub spreads: Vec<JsxSpread>,
  pub location: Location,
}

/// A call to a state setter/dispatcher inside a component body
#[derive(Debug, Clone)]
pub struct SetterCall {
  pub setter: String,
  pub location: Location,
}

/// Everything the global passes need to know about one component,
/// extracted from the AST while the worker still owns it
#[derive(Debug, Clone)]
pub struct ComponentInfo {
  pub name: String,
  pub kind: ComponentKind,
  pub memoized: bool,
  pub exported: bool,
  pub default_export: bool,
  pub props: Vec<PropDecl>,
  /// Non-destructured props parameter identifier, when used instead of a pattern
  pub props_param: Option<String>,
  /// `...rest` binding of a destructured props pattern
  pub rest_prop: Option<String>,
  /// Declared props referenced in the body outside pure forwarding positions
  pub props_used_locally: BTreeSet<String>,
  pub hooks: Vec<HookCall>,
  pub jsx: Vec<JsxUsage>,
  pub setter_calls: Vec<SetterCall>,
  /// Local name of the wrapped component, for `MemoWrapper` bindings
  pub wraps: Option<String>,
  pub location: Location,
  /// Byte span of the component body, for assigning AST nodes to components
  pub span: (u32, u32),
}

/// A module-level `createContext` binding
#[derive(Debug, Clone)]
pub struct ContextDecl {
  pub name: String,
  pub exported: bool,
  pub location: Location,
}

/// Default-export record, kept separate from the named export table because
/// memoization of the exported value matters for cross-file stability queries
#[derive(Debug, Clone)]
pub struct DefaultExport {
  /// Local binding the default resolves to, when it is a reference
  pub local_name: Option<String>,
  pub memoized: bool,
}

/// Owned, thread-transferable summary of one parsed file
///
/// The oxc arena never leaves the worker that parsed the file; everything the
/// graph builder and symbol table need is copied out into this structure.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
  pub file_path: PathBuf,
  pub imports: Vec<Import>,
  pub exports: Vec<Export>,
  pub components: Vec<ComponentInfo>,
  pub contexts: Vec<ContextDecl>,
  /// Module-scope `const` bindings; referentially stable across renders
  pub module_constants: BTreeSet<String>,
  pub default_export: Option<DefaultExport>,
  pub parse_errors: usize,
}
