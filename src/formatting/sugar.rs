//! Recognition of surface syntax hidden inside the parsed tree
//!
//! The parser desugars infix operators into plain applications, list
//! literals into cons chains, and numeric literals into conversion calls.
//! The helpers here recognize those shapes so the printer can restore the
//! original notation.

use crate::language::*;

// Marker attributes attached by the parser to retarget printing.
pub const THEOREM_MARKER: &str = "imandra_theorem";
pub const INSTANCE_MARKER: &str = "imandra_instance";
pub const EVAL_MARKER: &str = "imandra_eval";

// Comment attributes; these carry raw text payloads.
pub const BLOCK_COMMENT: &str = "ocaml.comment";
pub const DOC_COMMENT: &str = "ocaml.doc";
pub const TEXT_COMMENT: &str = "ocaml.text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// The fixed infix operator set, with binding strength and associativity.
/// Looser operators carry lower precedence numbers.
const INFIX_OPERATORS: &[(&str, u8, Associativity)] = &[
    ("||", 2, Associativity::Right),
    ("&&", 3, Associativity::Right),
    ("=", 4, Associativity::Left),
    ("==", 4, Associativity::Left),
    ("!=", 4, Associativity::Left),
    ("<>", 4, Associativity::Left),
    ("<", 4, Associativity::Left),
    ("<=", 4, Associativity::Left),
    (">", 4, Associativity::Left),
    (">=", 4, Associativity::Left),
    ("<.", 4, Associativity::Left),
    ("<=.", 4, Associativity::Left),
    (">.", 4, Associativity::Left),
    (">=.", 4, Associativity::Left),
    ("@", 5, Associativity::Right),
    ("@>", 5, Associativity::Right),
    ("@>|", 5, Associativity::Right),
    ("+", 6, Associativity::Left),
    ("-", 6, Associativity::Left),
    ("+.", 6, Associativity::Left),
    ("-.", 6, Associativity::Left),
    ("*", 7, Associativity::Left),
    ("/", 7, Associativity::Left),
    ("*.", 7, Associativity::Left),
    ("/.", 7, Associativity::Left),
];

fn lookup_operator(name: &str) -> Option<(u8, Associativity)> {
    INFIX_OPERATORS
        .iter()
        .find(|(op, _, _)| *op == name)
        .map(|(_, prec, assoc)| (*prec, *assoc))
}

/// An application recognized as `lhs op rhs`.
#[derive(Debug)]
pub struct InfixApp<'e> {
    pub operator: &'e str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub lhs: &'e Expression,
    pub rhs: &'e Expression,
}

/// Recognize an application of a known infix operator to exactly two
/// positional arguments.
pub fn as_infix<'e>(
    callee: &'e Expression,
    args: &'e [(ArgLabel, Expression)],
) -> Option<InfixApp<'e>> {
    let ExpressionDesc::Ident(ident) = &callee.desc else {
        return None;
    };
    let name = ident.as_plain()?;
    let (precedence, associativity) = lookup_operator(name)?;
    match args {
        [(ArgLabel::None, lhs), (ArgLabel::None, rhs)] => Some(InfixApp {
            operator: name,
            precedence,
            associativity,
            lhs,
            rhs,
        }),
        _ => None,
    }
}

/// Recognize an expression that will itself print as an infix application.
pub fn expression_as_infix(expr: &Expression) -> Option<InfixApp<'_>> {
    match &expr.desc {
        ExpressionDesc::Apply(callee, args) => as_infix(callee, args),
        _ => None,
    }
}

/// Whether an infix operand needs parentheses under its parent operator.
/// A nested infix is wrapped when it binds looser than the parent, or binds
/// equally tightly but sits on the non-associative side. Non-infix operands
/// are left to the ordinary parenthesization rules.
pub fn operand_needs_parens(parent: &InfixApp, side: Side, operand: &Expression) -> bool {
    match expression_as_infix(operand) {
        Some(child) => {
            if child.precedence != parent.precedence {
                child.precedence < parent.precedence
            } else {
                match (parent.associativity, side) {
                    (Associativity::Left, Side::Left) => false,
                    (Associativity::Right, Side::Right) => false,
                    _ => true,
                }
            }
        }
        None => false,
    }
}

/// A cons chain flattened into its elements. `tail` is the first
/// non-`::`/non-`[]` expression reached, if any.
#[derive(Debug)]
pub struct ConsChain<'e> {
    pub elements: Vec<&'e Expression>,
    pub tail: Option<&'e Expression>,
}

/// Flatten a `::` constructor application into list-literal elements.
/// Returns None when the expression is not a cons cell at all.
pub fn cons_chain(expr: &Expression) -> Option<ConsChain<'_>> {
    let mut elements = Vec::new();
    let mut current = expr;
    loop {
        match &current.desc {
            ExpressionDesc::Construct(ident, Some(arg))
                if ident.as_plain() == Some("::") =>
            {
                if let ExpressionDesc::Tuple(pair) = &arg.desc {
                    if let [head, rest] = pair.as_slice() {
                        elements.push(head);
                        current = rest;
                        continue;
                    }
                }
                return None;
            }
            ExpressionDesc::Construct(ident, None) if ident.as_plain() == Some("[]") => {
                if elements.is_empty() {
                    return None;
                }
                return Some(ConsChain {
                    elements,
                    tail: None,
                });
            }
            _ => {
                if elements.is_empty() {
                    return None;
                }
                return Some(ConsChain {
                    elements,
                    tail: Some(current),
                });
            }
        }
    }
}

/// Recognize `Z.of_nativeint c` and `Q.of_string c` conversion calls whose
/// single argument is a literal constant, and return the span of that
/// argument so its source spelling can be preserved verbatim.
pub fn literal_conversion(
    callee: &Expression,
    args: &[(ArgLabel, Expression)],
) -> Option<Span> {
    let ExpressionDesc::Ident(ident) = &callee.desc else {
        return None;
    };
    let converts = ident.is_qualified("Z", "of_nativeint") || ident.is_qualified("Q", "of_string");
    if !converts {
        return None;
    }
    match args {
        [(ArgLabel::None, arg)] if matches!(arg.desc, ExpressionDesc::Constant(_)) => {
            Some(arg.span)
        }
        _ => None,
    }
}

/// The nearest whitespace-delimited token ending before `offset` in the
/// original source. Used to tell `lemma` declarations apart from `theorem`
/// declarations, which parse identically.
pub fn preceding_token(source: &str, offset: usize) -> Option<&str> {
    let bytes = source.as_bytes();
    let mut end = offset.min(bytes.len());
    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    let mut start = end;
    while start > 0 && !bytes[start - 1].is_ascii_whitespace() {
        start -= 1;
    }
    Some(&source[start..end])
}

pub fn has_marker(attributes: &[Attribute], marker: &str) -> bool {
    attributes.iter().any(|attr| attr.name == marker)
}

/// Attributes left over once markers are consumed; these go through the
/// generic attribute renderer.
pub fn filtered_attributes(attributes: &[Attribute]) -> Vec<&Attribute> {
    attributes
        .iter()
        .filter(|attr| {
            attr.name != THEOREM_MARKER
                && attr.name != INSTANCE_MARKER
                && attr.name != EVAL_MARKER
        })
        .collect()
}
