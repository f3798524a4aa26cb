//! Types representing an Abstract Syntax Tree for the IML language
//!
//! The tree mirrors the shape the external parser emits: each syntactic
//! category is a closed enum of discriminant tags, wrapped (where the
//! category is a composite record) in a struct carrying the source span and
//! the attached attributes. Spans refer to character offsets in the original
//! buffer; they are consulted only for verbatim fallback, preserved numeric
//! literals, and the declaration-keyword scan — never for ordinary layout.

/// Half-open range of character offsets into the original source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the original source text, clamped to the buffer. A span that
    /// lands inside a multibyte character yields the empty string rather
    /// than panicking.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        let start = self.start.min(source.len());
        let end = self.end.clamp(start, source.len());
        source.get(start..end).unwrap_or("")
    }
}

/// A possibly module-qualified identifier such as `x` or `Z.of_nativeint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Longident {
    Ident(String),
    Dot(Box<Longident>, String),
    Apply(Box<Longident>, Box<Longident>),
}

impl Longident {
    pub fn ident(name: &str) -> Longident {
        Longident::Ident(name.to_string())
    }

    pub fn dot(module: &str, name: &str) -> Longident {
        Longident::Dot(Box::new(Longident::ident(module)), name.to_string())
    }

    /// The unqualified identifier, if this is a plain `Lident`.
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Longident::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// True for a single-level qualification `Module.name`.
    pub fn is_qualified(&self, module: &str, name: &str) -> bool {
        match self {
            Longident::Dot(prefix, last) => {
                last == name && prefix.as_plain() == Some(module)
            }
            _ => false,
        }
    }
}

/// Literal constants. The integer and float payloads keep the source
/// spelling (the parser does) along with the optional suffix character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Integer(String, Option<char>),
    Char(char),
    String(String, Option<String>),
    Float(String, Option<char>),
}

/// Labels on function parameters and call arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgLabel {
    None,
    Labelled(String),
    Optional(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecFlag {
    Nonrecursive,
    Recursive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedFlag {
    Closed,
    Open,
}

/// Metadata attached to a node. Attributes never change the tree shape but
/// may retarget how the owning node prints (comments, theorem markers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub payload: Payload,
    pub span: Span,
}

impl Attribute {
    /// The raw string carried by comment-style attributes, whose payload is
    /// a single evaluated string constant.
    pub fn raw_text(&self) -> Option<&str> {
        if let Payload::Structure(items) = &self.payload {
            if let [item] = items.as_slice() {
                if let StructureItemDesc::Eval(expr, _) = &item.desc {
                    if let ExpressionDesc::Constant(Constant::String(text, _)) = &expr.desc {
                        return Some(text);
                    }
                }
            }
        }
        None
    }
}

/// Payload of an attribute or extension point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Structure(Vec<StructureItem>),
    Signature,
    Type,
    Pattern,
}

/// Extension point `[%id PAYLOAD]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreType {
    pub desc: CoreTypeDesc,
    pub span: Span,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreTypeDesc {
    Any,
    Var(String),
    Arrow(ArgLabel, Box<CoreType>, Box<CoreType>),
    Tuple(Vec<CoreType>),
    Constr(Longident, Vec<CoreType>),
    Alias(Box<CoreType>, String),
    Object,
    Class,
    Variant,
    Poly,
    Package,
    Open,
    Extension,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub desc: PatternDesc,
    pub span: Span,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternDesc {
    Any,
    Var(String),
    Alias(Box<Pattern>, String),
    Constant(Constant),
    Interval(Constant, Constant),
    Tuple(Vec<Pattern>),
    Construct(Longident, Option<ConstructPattern>),
    Variant(String, Option<Box<Pattern>>),
    Record(Vec<(Longident, Pattern)>, ClosedFlag),
    Array(Vec<Pattern>),
    Or(Box<Pattern>, Box<Pattern>),
    Constraint(Box<Pattern>, Box<CoreType>),
    Type(Longident),
    Lazy(Box<Pattern>),
    Unpack(Option<String>),
    Exception(Box<Pattern>),
    Effect(Box<Pattern>, Box<Pattern>),
    Extension(Extension),
    Open(Longident, Box<Pattern>),
    Unknown(String),
}

/// Argument of a constructor pattern, `C (type a b) P`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructPattern {
    pub newtypes: Vec<String>,
    pub pattern: Box<Pattern>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub desc: ExpressionDesc,
    pub span: Span,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionDesc {
    Ident(Longident),
    Constant(Constant),
    Let(RecFlag, Vec<ValueBinding>, Box<Expression>),
    Function(Vec<FunctionParam>, FunctionBody),
    Apply(Box<Expression>, Vec<(ArgLabel, Expression)>),
    Match(Box<Expression>, Vec<Case>),
    Try(Box<Expression>, Vec<Case>),
    Tuple(Vec<Expression>),
    Construct(Longident, Option<Box<Expression>>),
    Variant(String, Option<Box<Expression>>),
    Record(Vec<(Longident, Expression)>, Option<Box<Expression>>),
    Field(Box<Expression>, Longident),
    SetField(Box<Expression>, Longident, Box<Expression>),
    Array(Vec<Expression>),
    IfThenElse(Box<Expression>, Box<Expression>, Option<Box<Expression>>),
    Sequence(Box<Expression>, Box<Expression>),
    While(Box<Expression>, Box<Expression>),
    For(Box<Pattern>, Box<Expression>, Box<Expression>, Direction, Box<Expression>),
    Constraint(Box<Expression>, Box<CoreType>),
    Coerce(Box<Expression>, Option<Box<CoreType>>, Box<CoreType>),
    Send(Box<Expression>, String),
    New(Longident),
    SetInstVar(String, Box<Expression>),
    Override(Vec<(String, Expression)>),
    LetModule(Option<String>, Box<ModuleExpr>, Box<Expression>),
    LetException(ExtensionConstructor, Box<Expression>),
    Assert(Box<Expression>),
    Lazy(Box<Expression>),
    Poly(Box<Expression>, Option<Box<CoreType>>),
    Object,
    NewType(String, Box<Expression>),
    Pack(Box<ModuleExpr>),
    OpenIn(OpenDeclaration, Box<Expression>),
    LetOp(Box<LetOp>),
    Extension(Extension),
    Unreachable,
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upto,
    Downto,
}

/// One `pattern = expression` binding of a `let` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBinding {
    pub pattern: Pattern,
    pub expr: Expression,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

/// One `pattern -> expression` case, with an optional `when` guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub lhs: Pattern,
    pub guard: Option<Expression>,
    pub rhs: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionParam {
    Value {
        label: ArgLabel,
        default: Option<Expression>,
        pattern: Pattern,
    },
    NewType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionBody {
    Expression(Box<Expression>),
    Cases(Vec<Case>),
}

/// `let* P = E and* Q = F in BODY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetOp {
    pub binding: BindingOp,
    pub ands: Vec<BindingOp>,
    pub body: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOp {
    pub op: String,
    pub pattern: Pattern,
    pub expr: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleExpr {
    pub desc: ModuleExprDesc,
    pub span: Span,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleExprDesc {
    Ident(Longident),
    Structure(Vec<StructureItem>),
    Functor,
    Apply,
    ApplyUnit,
    Constraint,
    Unpack,
    Extension,
    Unknown(String),
}

/// `module X = ME` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBinding {
    pub name: Option<String>,
    pub expr: ModuleExpr,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

/// `open M`, with the override flag for `open!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDeclaration {
    pub expr: ModuleExpr,
    pub override_: bool,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub manifest: Option<CoreType>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Abstract,
    Variant(Vec<ConstructorDeclaration>),
    Record(Vec<LabelDeclaration>),
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDeclaration {
    pub name: String,
    pub args: ConstructorArguments,
    pub result: Option<CoreType>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArguments {
    Tuple(Vec<CoreType>),
    Record(Vec<LabelDeclaration>),
}

impl ConstructorArguments {
    pub fn is_empty(&self) -> bool {
        match self {
            ConstructorArguments::Tuple(types) => types.is_empty(),
            ConstructorArguments::Record(labels) => labels.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDeclaration {
    pub name: String,
    pub mutable_: bool,
    pub typ: CoreType,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

/// Constructor of an extensible type or exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConstructor {
    pub name: String,
    pub kind: ExtensionConstructorKind,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionConstructorKind {
    Decl(Vec<String>, ConstructorArguments, Option<CoreType>),
    Rebind(Longident),
}

/// `exception C of T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeException {
    pub constructor: ExtensionConstructor,
    pub attributes: Vec<Attribute>,
}

/// `val x : T` or `external x : T = "prim"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDescription {
    pub name: String,
    pub typ: CoreType,
    pub prims: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureItem {
    pub desc: StructureItemDesc,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureItemDesc {
    Eval(Expression, Vec<Attribute>),
    Value(RecFlag, Vec<ValueBinding>),
    Primitive(ValueDescription),
    Type(RecFlag, Vec<TypeDeclaration>),
    TypeExt,
    Exception(TypeException),
    Module(ModuleBinding),
    RecModule,
    ModType,
    Open(OpenDeclaration),
    Class,
    ClassType,
    Include,
    Attribute(Attribute),
    Extension,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub arg: Option<DirectiveArgument>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveArgument {
    pub desc: DirectiveArgumentDesc,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveArgumentDesc {
    String(String),
    Int(String, Option<char>),
    Ident(Longident),
    Bool(bool),
    Unknown(String),
}

/// One top-level unit of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phrase {
    Definitions(Vec<StructureItem>),
    Directive(Directive),
}

/// A whole parsed source file, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub phrases: Vec<Phrase>,
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn span_slices_the_source() {
        let source = "let a = 1";
        assert_eq!(Span::new(4, 5).text(source), "a");
    }

    #[test]
    fn span_is_clamped_to_the_buffer() {
        let source = "let a = 1";
        assert_eq!(Span::new(8, 40).text(source), "1");
        assert_eq!(Span::new(40, 50).text(source), "");
    }

    #[test]
    fn span_inside_a_multibyte_character_is_empty() {
        let source = "let é = 1";
        // 5 splits the two-byte character
        assert_eq!(Span::new(4, 5).text(source), "");
    }

    #[test]
    fn cover_spans_both_ranges() {
        let covered = Span::new(4, 9).cover(&Span::new(0, 6));
        assert_eq!(covered, Span::new(0, 9));
    }
}
