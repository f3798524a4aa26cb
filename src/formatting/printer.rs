//! The layout printer, turning syntax trees into layout documents
//!
//! One method per syntactic category, each returning a [`Document`] or a
//! [`PrintError`]. Errors are caught only at phrase granularity, where the
//! phrase falls back to its verbatim source text. Expressions thread a
//! `needs_parens` flag downward; only the arms that can produce ambiguous
//! output (applications, functions, constructor applications) consult it.

use pretty::RcDoc;

use crate::formatting::options::{Options, Semicolons};
use crate::formatting::sugar;
use crate::formatting::sugar::{InfixApp, Side};
use crate::formatting::{Document, PrintError};
use crate::language::*;

fn text(s: &str) -> Document {
    RcDoc::text(s.to_string())
}

fn space() -> Document {
    text(" ")
}

fn parens(doc: Document) -> Document {
    text("(").append(doc).append(text(")"))
}

fn maybe_parens(wrap: bool, doc: Document) -> Document {
    if wrap {
        parens(doc)
    } else {
        doc
    }
}

fn join(docs: Vec<Document>, separator: Document) -> Document {
    let mut result = RcDoc::nil();
    for (i, doc) in docs.into_iter().enumerate() {
        if i > 0 {
            result = result.append(separator.clone());
        }
        result = result.append(doc);
    }
    result
}

fn blank_line() -> Document {
    RcDoc::hardline().append(RcDoc::hardline())
}

pub struct Printer<'i> {
    source: &'i str,
    options: Options,
}

impl<'i> Printer<'i> {
    pub fn new(source: &'i str, options: Options) -> Printer<'i> {
        Printer { source, options }
    }

    pub fn program(&self, program: &Program) -> Result<Document, PrintError> {
        let mut docs = Vec::new();
        for phrase in &program.phrases {
            docs.push(self.phrase(phrase)?);
        }
        Ok(join(docs, blank_line()))
    }

    /// Print one phrase, substituting the verbatim source slice when any
    /// node inside it fails to print. A failing phrase with no source
    /// location to fall back to is fatal.
    fn phrase(&self, phrase: &Phrase) -> Result<Document, PrintError> {
        match phrase {
            Phrase::Definitions(items) => match self.definitions(items) {
                Ok(doc) => Ok(match self.options.semicolons {
                    Semicolons::Required => doc.append(text(";;")),
                    Semicolons::None => doc,
                }),
                Err(error) => {
                    let (Some(first), Some(last)) = (items.first(), items.last()) else {
                        return Err(PrintError::EmptyPhrase);
                    };
                    tracing::warn!("keeping phrase verbatim: {}", error);
                    let span = first.span.cover(&last.span);
                    Ok(text(span.text(self.source)))
                }
            },
            Phrase::Directive(directive) => match self.directive(directive) {
                Ok(doc) => Ok(doc),
                Err(error) => {
                    tracing::warn!("keeping directive verbatim: {}", error);
                    Ok(text(directive.span.text(self.source)))
                }
            },
        }
    }

    fn definitions(&self, items: &[StructureItem]) -> Result<Document, PrintError> {
        let mut docs = Vec::new();
        for item in items {
            docs.push(self.structure_item(item)?);
        }
        Ok(join(docs, blank_line()))
    }

    fn structure_item(&self, item: &StructureItem) -> Result<Document, PrintError> {
        match &item.desc {
            StructureItemDesc::Eval(expr, attrs) => {
                let comments = self.leading_comments(attrs);
                let body = if sugar::has_marker(attrs, sugar::EVAL_MARKER) {
                    text("eval ").append(self.expression(expr, false)?)
                } else {
                    self.expression(expr, false)?
                };
                let rest = sugar::filtered_attributes(attrs);
                Ok(comments
                    .append(body)
                    .append(self.attribute_lines(&rest, 2)?))
            }
            StructureItemDesc::Value(rec, bindings) => self.value_group(*rec, bindings),
            StructureItemDesc::Primitive(vd) => self.value_description(vd),
            StructureItemDesc::Type(_, decls) => {
                let mut docs = Vec::new();
                for decl in decls {
                    docs.push(self.type_declaration(decl)?);
                }
                Ok(text("type")
                    .append(
                        RcDoc::line()
                            .append(join(docs, RcDoc::line().append(text("and "))))
                            .nest(2),
                    )
                    .group())
            }
            StructureItemDesc::Exception(exc) => {
                let ctor = self.extension_constructor(&exc.constructor)?;
                let attrs: Vec<&Attribute> = exc.attributes.iter().collect();
                Ok(text("exception ")
                    .append(ctor)
                    .append(self.attribute_lines(&attrs, 2)?))
            }
            StructureItemDesc::Module(mb) => {
                let name = mb.name.as_deref().unwrap_or("_");
                let attrs: Vec<&Attribute> = mb.attributes.iter().collect();
                Ok(text("module ")
                    .append(text(name))
                    .append(text(" = "))
                    .append(self.module_expr(&mb.expr)?)
                    .append(self.attribute_lines(&attrs, 2)?))
            }
            StructureItemDesc::Open(decl) => {
                let keyword = if decl.override_ { "open! " } else { "open " };
                let attrs: Vec<&Attribute> = decl.attributes.iter().collect();
                Ok(text(keyword)
                    .append(self.module_expr(&decl.expr)?)
                    .append(self.attribute_lines(&attrs, 2)?))
            }
            StructureItemDesc::Attribute(attr) => self.attribute(attr, 3),
            StructureItemDesc::TypeExt => Err(PrintError::Unsupported("type extension")),
            StructureItemDesc::RecModule => Err(PrintError::Unsupported("recursive module")),
            StructureItemDesc::ModType => Err(PrintError::Unsupported("module type")),
            StructureItemDesc::Class => Err(PrintError::Unsupported("class declaration")),
            StructureItemDesc::ClassType => Err(PrintError::Unsupported("class type")),
            StructureItemDesc::Include => Err(PrintError::Unsupported("include")),
            StructureItemDesc::Extension => Err(PrintError::Unsupported("item extension")),
            StructureItemDesc::Unknown(tag) => Err(PrintError::Malformed(tag.clone())),
        }
    }

    /// A `let` group, which may really be a theorem, lemma, or instance
    /// declaration depending on the marker attributes the parser attached
    /// to its first binding.
    fn value_group(&self, rec: RecFlag, bindings: &[ValueBinding]) -> Result<Document, PrintError> {
        let Some(first) = bindings.first() else {
            return Err(PrintError::Malformed("empty binding group".to_string()));
        };
        let attrs = &first.attributes;

        let mut keyword = if sugar::has_marker(attrs, sugar::THEOREM_MARKER) {
            // Theorems and lemmas parse identically; only the keyword in the
            // source tells them apart.
            match sugar::preceding_token(self.source, first.span.start) {
                Some("lemma") => text("lemma"),
                _ => text("theorem"),
            }
        } else if sugar::has_marker(attrs, sugar::INSTANCE_MARKER) {
            text("instance")
        } else {
            text("let")
        };
        if rec == RecFlag::Recursive {
            keyword = keyword.append(text(" rec"));
        }

        let comments = self.leading_comments(attrs);
        let rest = sugar::filtered_attributes(attrs);
        let trailing = self.attribute_lines(&rest, 2)?;

        if sugar::has_marker(attrs, sugar::INSTANCE_MARKER) {
            // Instances always show their witness parenthesized.
            let body = match &first.expr.desc {
                ExpressionDesc::Function(_, _) => self.expression(&first.expr, true)?,
                _ => parens(self.expression(&first.expr, false)?),
            };
            let doc = keyword
                .append(RcDoc::line().append(body).nest(2))
                .group();
            return Ok(comments.append(doc).append(trailing));
        }

        if let [binding] = bindings {
            if let ExpressionDesc::Function(params, FunctionBody::Expression(body)) =
                &binding.expr.desc
            {
                // Hoist the parameters onto the declaration line.
                let mut head = keyword
                    .append(RcDoc::line())
                    .append(self.pattern(&binding.pattern)?);
                for param in params {
                    head = head
                        .append(RcDoc::line())
                        .append(self.function_param(param)?);
                }
                let head = head.append(RcDoc::line()).append(text("=")).group();
                let doc = head
                    .append(RcDoc::line().append(self.expression(body, false)?).nest(2))
                    .group();
                return Ok(comments.append(doc).append(trailing));
            }
        }

        let mut docs = Vec::new();
        for binding in bindings {
            docs.push(self.value_binding(binding)?);
        }
        let doc = keyword
            .append(
                RcDoc::line()
                    .append(join(docs, RcDoc::line().append(text("and "))))
                    .nest(2),
            )
            .group();
        Ok(comments.append(doc).append(trailing))
    }

    fn value_binding(&self, binding: &ValueBinding) -> Result<Document, PrintError> {
        Ok(self
            .pattern(&binding.pattern)?
            .append(RcDoc::line())
            .append(text("="))
            .append(RcDoc::line())
            .append(self.expression(&binding.expr, false)?)
            .group())
    }

    fn value_description(&self, vd: &ValueDescription) -> Result<Document, PrintError> {
        let keyword = if vd.prims.is_empty() { "val " } else { "external " };
        let mut doc = text(keyword)
            .append(text(&vd.name))
            .append(text(" : "))
            .append(self.core_type(&vd.typ)?);
        if !vd.prims.is_empty() {
            doc = doc.append(text(" ="));
            for prim in &vd.prims {
                doc = doc.append(space()).append(text(&format!("\"{}\"", prim)));
            }
        }
        let attrs: Vec<&Attribute> = vd.attributes.iter().collect();
        Ok(doc.append(self.attribute_lines(&attrs, 2)?))
    }

    fn type_declaration(&self, decl: &TypeDeclaration) -> Result<Document, PrintError> {
        let mut doc = text(&decl.name);
        let body = match &decl.kind {
            TypeKind::Abstract => match &decl.manifest {
                Some(manifest) => Some(self.core_type(manifest)?),
                None => None,
            },
            TypeKind::Variant(ctors) => Some(self.variant_constructors(ctors)?),
            TypeKind::Record(labels) => Some(self.record_fields(labels)?),
            TypeKind::Open => return Err(PrintError::Unsupported("extensible type")),
        };
        if let Some(body) = body {
            doc = doc
                .append(text(" ="))
                .append(RcDoc::line().append(body).nest(2))
                .group();
        }
        let mut result = doc;
        for attr in &decl.attributes {
            if attr.name != sugar::BLOCK_COMMENT {
                result = result
                    .append(RcDoc::line())
                    .append(self.attribute(attr, 2)?);
            }
        }
        Ok(result.group())
    }

    fn variant_constructors(
        &self,
        ctors: &[ConstructorDeclaration],
    ) -> Result<Document, PrintError> {
        let mut docs = Vec::new();
        for ctor in ctors {
            let mut doc = text(&ctor.name);
            if ctor.result.is_some() {
                return Err(PrintError::Unsupported("GADT constructor"));
            }
            if !ctor.args.is_empty() {
                doc = doc
                    .append(text(" of "))
                    .append(self.constructor_arguments(&ctor.args)?);
            }
            for attr in &ctor.attributes {
                if attr.name != sugar::BLOCK_COMMENT {
                    doc = doc.append(space()).append(self.attribute(attr, 1)?);
                }
            }
            docs.push(doc);
        }
        let bar = text("| ").flat_alt(RcDoc::nil());
        Ok(bar.append(join(docs, RcDoc::line().append(text("| ")))))
    }

    fn constructor_arguments(&self, args: &ConstructorArguments) -> Result<Document, PrintError> {
        match args {
            ConstructorArguments::Tuple(types) => {
                let mut docs = Vec::new();
                for typ in types {
                    docs.push(self.core_type(typ)?);
                }
                Ok(join(docs, text(" * ")))
            }
            ConstructorArguments::Record(labels) => self.record_fields(labels),
        }
    }

    fn record_fields(&self, labels: &[LabelDeclaration]) -> Result<Document, PrintError> {
        let mut docs = Vec::new();
        for label in labels {
            let mut doc = if label.mutable_ {
                text("mutable ")
            } else {
                RcDoc::nil()
            };
            doc = doc
                .append(text(&label.name))
                .append(text(" : "))
                .append(self.core_type(&label.typ)?);
            for attr in &label.attributes {
                if attr.name != sugar::BLOCK_COMMENT {
                    doc = doc.append(space()).append(self.attribute(attr, 1)?);
                }
            }
            docs.push(doc);
        }
        Ok(text("{")
            .append(
                RcDoc::line()
                    .append(join(docs, text(";").append(RcDoc::line())))
                    .append(text(";"))
                    .append(RcDoc::line())
                    .append(text("}"))
                    .nest(2),
            )
            .group())
    }

    fn extension_constructor(
        &self,
        ctor: &ExtensionConstructor,
    ) -> Result<Document, PrintError> {
        let mut doc = text(&ctor.name);
        match &ctor.kind {
            ExtensionConstructorKind::Decl(existentials, args, result) => {
                if !existentials.is_empty() || result.is_some() {
                    return Err(PrintError::Unsupported("GADT exception declaration"));
                }
                if !args.is_empty() {
                    doc = doc
                        .append(text(" of "))
                        .append(self.constructor_arguments(args)?);
                }
            }
            ExtensionConstructorKind::Rebind(lid) => {
                doc = doc.append(text(" = ")).append(self.longident(lid));
            }
        }
        for attr in &ctor.attributes {
            if attr.name != sugar::BLOCK_COMMENT {
                doc = doc.append(space()).append(self.attribute(attr, 1)?);
            }
        }
        Ok(doc)
    }

    fn module_expr(&self, me: &ModuleExpr) -> Result<Document, PrintError> {
        match &me.desc {
            ModuleExprDesc::Ident(lid) => Ok(self.longident(lid)),
            ModuleExprDesc::Structure(items) => Ok(text("struct")
                .append(RcDoc::hardline().append(self.definitions(items)?).nest(2))
                .append(RcDoc::hardline())
                .append(text("end"))),
            ModuleExprDesc::Functor => Err(PrintError::Unsupported("functor")),
            ModuleExprDesc::Apply | ModuleExprDesc::ApplyUnit => {
                Err(PrintError::Unsupported("functor application"))
            }
            ModuleExprDesc::Constraint => Err(PrintError::Unsupported("module constraint")),
            ModuleExprDesc::Unpack => Err(PrintError::Unsupported("module unpacking")),
            ModuleExprDesc::Extension => Err(PrintError::Unsupported("module extension")),
            ModuleExprDesc::Unknown(tag) => Err(PrintError::Malformed(tag.clone())),
        }
    }

    fn directive(&self, directive: &Directive) -> Result<Document, PrintError> {
        let mut doc = text("#").append(text(&directive.name));
        if let Some(arg) = &directive.arg {
            doc = doc.append(space()).append(self.directive_argument(arg)?);
        }
        Ok(doc.append(text(";;")))
    }

    fn directive_argument(&self, arg: &DirectiveArgument) -> Result<Document, PrintError> {
        match &arg.desc {
            DirectiveArgumentDesc::String(s) => Ok(text(&format!("\"{}\"", s))),
            DirectiveArgumentDesc::Int(repr, suffix) => Ok(match suffix {
                Some(c) => text(&format!("{}{}", repr, c)),
                None => text(repr),
            }),
            DirectiveArgumentDesc::Ident(lid) => Ok(self.longident(lid)),
            DirectiveArgumentDesc::Bool(true) => Ok(text("true")),
            DirectiveArgumentDesc::Bool(false) => Ok(text("false")),
            DirectiveArgumentDesc::Unknown(tag) => Err(PrintError::Malformed(tag.clone())),
        }
    }

    pub fn expression(
        &self,
        expr: &Expression,
        needs_parens: bool,
    ) -> Result<Document, PrintError> {
        let mut doc = self.expression_desc(expr, needs_parens)?;
        for attr in &expr.attributes {
            if attr.name != sugar::BLOCK_COMMENT {
                doc = doc.append(space()).append(self.attribute(attr, 1)?);
            }
        }
        Ok(doc)
    }

    fn expression_desc(
        &self,
        expr: &Expression,
        needs_parens: bool,
    ) -> Result<Document, PrintError> {
        match &expr.desc {
            ExpressionDesc::Ident(lid) => Ok(self.longident(lid)),
            ExpressionDesc::Constant(constant) => Ok(self.constant(constant)),
            ExpressionDesc::Construct(lid, arg) => {
                if let Some(chain) = sugar::cons_chain(expr) {
                    return self.list_literal(&chain);
                }
                let mut doc = self.longident(lid);
                match arg {
                    Some(arg) => {
                        doc = doc
                            .append(RcDoc::line())
                            .append(self.expression(arg, true)?)
                            .group();
                        Ok(maybe_parens(needs_parens, doc))
                    }
                    None => Ok(doc),
                }
            }
            ExpressionDesc::Let(rec, bindings, body) => {
                let mut doc = text("let");
                if *rec == RecFlag::Recursive {
                    doc = doc.append(text(" rec"));
                }
                let mut docs = Vec::new();
                for binding in bindings {
                    docs.push(self.value_binding(binding)?);
                }
                Ok(doc
                    .append(space())
                    .append(join(docs, RcDoc::hardline().append(text("and "))))
                    .append(text(" in"))
                    .append(RcDoc::hardline())
                    .append(self.expression(body, false)?))
            }
            ExpressionDesc::Function(params, body) => {
                let mut doc = text("fun");
                for param in params {
                    doc = doc
                        .append(RcDoc::line())
                        .append(self.function_param(param)?);
                }
                doc = doc
                    .append(RcDoc::line())
                    .append(text("->"))
                    .append(RcDoc::line().append(self.function_body(body)?).nest(2))
                    .group();
                Ok(maybe_parens(needs_parens, doc))
            }
            ExpressionDesc::Apply(callee, args) => {
                if let Some(infix) = sugar::as_infix(callee, args) {
                    let lhs = self.infix_operand(&infix, Side::Left, infix.lhs)?;
                    let rhs = self.infix_operand(&infix, Side::Right, infix.rhs)?;
                    let doc = lhs
                        .append(RcDoc::line())
                        .append(text(infix.operator))
                        .append(RcDoc::line())
                        .append(rhs)
                        .group();
                    return Ok(maybe_parens(needs_parens, doc));
                }
                if let Some(span) = sugar::literal_conversion(callee, args) {
                    // The parser rewrites numeric literals into conversion
                    // calls; the source spelling is the only faithful form.
                    return Ok(text(span.text(self.source)));
                }
                let mut doc = self.expression(callee, true)?;
                for (label, arg) in args {
                    doc = doc.append(RcDoc::line()).append(self.argument(label, arg)?);
                }
                Ok(maybe_parens(needs_parens, doc.group()))
            }
            ExpressionDesc::Match(scrutinee, cases) => {
                let doc = text("match")
                    .append(RcDoc::line().append(self.expression(scrutinee, true)?).nest(2))
                    .append(RcDoc::line())
                    .append(text("with"))
                    .append(RcDoc::line())
                    .append(text("| ").flat_alt(RcDoc::nil()))
                    .append(self.cases(cases)?)
                    .group();
                Ok(maybe_parens(needs_parens, doc))
            }
            ExpressionDesc::Try(body, cases) => {
                let doc = text("try")
                    .append(RcDoc::line().append(self.expression(body, false)?).nest(2))
                    .append(RcDoc::line())
                    .append(text("with"))
                    .append(RcDoc::line())
                    .append(text("| ").flat_alt(RcDoc::nil()))
                    .append(self.cases(cases)?)
                    .group();
                Ok(maybe_parens(needs_parens, doc))
            }
            ExpressionDesc::Tuple(elems) => {
                let mut docs = Vec::new();
                for elem in elems {
                    docs.push(self.expression(elem, false)?);
                }
                Ok(text("(")
                    .append(
                        RcDoc::line_()
                            .append(join(docs, text(",").append(RcDoc::line())))
                            .nest(1),
                    )
                    .append(RcDoc::line_())
                    .append(text(")"))
                    .group())
            }
            ExpressionDesc::Variant(label, arg) => {
                let mut doc = text("`").append(text(label));
                if let Some(arg) = arg {
                    doc = doc.append(space()).append(self.expression(arg, true)?);
                }
                Ok(doc)
            }
            ExpressionDesc::Record(fields, base) => {
                let mut docs = Vec::new();
                for (lid, value) in fields {
                    docs.push(
                        self.longident(lid)
                            .append(text(" = "))
                            .append(self.expression(value, false)?),
                    );
                }
                let fields_doc = join(docs, text(";").append(RcDoc::line()));
                let inner = match base {
                    Some(base) => self
                        .expression(base, false)?
                        .append(text(" with"))
                        .append(RcDoc::line())
                        .append(fields_doc),
                    None => fields_doc,
                };
                Ok(text("{")
                    .append(RcDoc::line().append(inner).nest(2))
                    .append(RcDoc::line())
                    .append(text("}"))
                    .group())
            }
            ExpressionDesc::Field(record, lid) => Ok(self
                .expression(record, true)?
                .append(text("."))
                .append(self.longident(lid))),
            ExpressionDesc::SetField(record, lid, value) => Ok(self
                .expression(record, true)?
                .append(text("."))
                .append(self.longident(lid))
                .append(text(" <- "))
                .append(self.expression(value, false)?)),
            ExpressionDesc::Array(elems) => {
                let mut docs = Vec::new();
                for elem in elems {
                    docs.push(self.expression(elem, false)?);
                }
                Ok(text("[|")
                    .append(
                        RcDoc::line()
                            .append(join(docs, text(";").append(RcDoc::line())))
                            .nest(2),
                    )
                    .append(RcDoc::line())
                    .append(text("|]"))
                    .group())
            }
            ExpressionDesc::IfThenElse(cond, then, otherwise) => {
                let mut doc = text("if")
                    .append(RcDoc::line().append(self.expression(cond, false)?).nest(2))
                    .append(RcDoc::line())
                    .append(text("then"))
                    .append(RcDoc::line().append(self.expression(then, false)?).nest(2));
                if let Some(otherwise) = otherwise {
                    doc = doc
                        .append(RcDoc::line())
                        .append(text("else"))
                        .append(
                            RcDoc::line()
                                .append(self.expression(otherwise, false)?)
                                .nest(2),
                        );
                }
                Ok(maybe_parens(needs_parens, doc.group()))
            }
            ExpressionDesc::Sequence(first, second) => Ok(self
                .expression(first, false)?
                .append(text(";"))
                .append(RcDoc::line())
                .append(self.expression(second, false)?)
                .group()),
            ExpressionDesc::While(cond, body) => Ok(text("while ")
                .append(self.expression(cond, false)?)
                .append(text(" do"))
                .append(RcDoc::hardline().append(self.expression(body, false)?).nest(2))
                .append(RcDoc::hardline())
                .append(text("done"))),
            ExpressionDesc::For(pat, from, to, direction, body) => {
                let keyword = match direction {
                    Direction::Upto => " to ",
                    Direction::Downto => " downto ",
                };
                Ok(text("for ")
                    .append(self.pattern(pat)?)
                    .append(text(" = "))
                    .append(self.expression(from, false)?)
                    .append(text(keyword))
                    .append(self.expression(to, false)?)
                    .append(text(" do"))
                    .append(RcDoc::hardline().append(self.expression(body, false)?).nest(2))
                    .append(RcDoc::hardline())
                    .append(text("done")))
            }
            ExpressionDesc::Constraint(value, typ) => Ok(parens(
                self.expression(value, false)?
                    .append(text(" : "))
                    .append(self.core_type(typ)?),
            )),
            ExpressionDesc::Coerce(value, from, to) => {
                let mut doc = self.expression(value, false)?;
                if let Some(from) = from {
                    doc = doc.append(text(" : ")).append(self.core_type(from)?);
                }
                Ok(parens(doc.append(text(" :> ")).append(self.core_type(to)?)))
            }
            ExpressionDesc::Send(receiver, method) => Ok(self
                .expression(receiver, true)?
                .append(text(" # "))
                .append(text(method))),
            ExpressionDesc::New(lid) => Ok(text("new ").append(self.longident(lid))),
            ExpressionDesc::SetInstVar(name, value) => Ok(text(name)
                .append(text(" <- "))
                .append(self.expression(value, false)?)),
            ExpressionDesc::Override(fields) => {
                let mut docs = Vec::new();
                for (name, value) in fields {
                    docs.push(
                        text(name)
                            .append(text(" = "))
                            .append(self.expression(value, false)?),
                    );
                }
                Ok(text("{< ")
                    .append(join(docs, text("; ")))
                    .append(text(" >}")))
            }
            ExpressionDesc::LetModule(name, me, body) => Ok(text("let module ")
                .append(text(name.as_deref().unwrap_or("_")))
                .append(text(" = "))
                .append(self.module_expr(me)?)
                .append(text(" in"))
                .append(RcDoc::hardline())
                .append(self.expression(body, false)?)),
            ExpressionDesc::LetException(ctor, body) => Ok(text("let exception ")
                .append(self.extension_constructor(ctor)?)
                .append(text(" in"))
                .append(RcDoc::hardline())
                .append(self.expression(body, false)?)),
            ExpressionDesc::Assert(value) => {
                Ok(text("assert ").append(self.expression(value, true)?))
            }
            ExpressionDesc::Lazy(value) => {
                Ok(text("lazy ").append(self.expression(value, true)?))
            }
            ExpressionDesc::Poly(value, typ) => {
                let mut doc = self.expression(value, false)?;
                if let Some(typ) = typ {
                    doc = doc.append(text(" : ")).append(self.core_type(typ)?);
                }
                Ok(doc)
            }
            ExpressionDesc::Object => Err(PrintError::Unsupported("object expression")),
            ExpressionDesc::NewType(name, body) => {
                let doc = text("fun (type ")
                    .append(text(name))
                    .append(text(") -> "))
                    .append(self.expression(body, false)?);
                Ok(maybe_parens(needs_parens, doc))
            }
            ExpressionDesc::Pack(me) => {
                Ok(text("(module ").append(self.module_expr(me)?).append(text(")")))
            }
            ExpressionDesc::OpenIn(decl, body) => {
                let keyword = if decl.override_ {
                    "let open! "
                } else {
                    "let open "
                };
                Ok(text(keyword)
                    .append(self.module_expr(&decl.expr)?)
                    .append(text(" in"))
                    .append(RcDoc::hardline())
                    .append(self.expression(body, false)?))
            }
            ExpressionDesc::LetOp(letop) => {
                let mut doc = self.binding_op(&letop.binding)?;
                for and in &letop.ands {
                    doc = doc
                        .append(RcDoc::hardline())
                        .append(self.binding_op(and)?);
                }
                Ok(doc
                    .append(text(" in"))
                    .append(RcDoc::hardline())
                    .append(self.expression(&letop.body, false)?))
            }
            ExpressionDesc::Extension(ext) => self.extension(ext),
            ExpressionDesc::Unreachable => Ok(text(".")),
            ExpressionDesc::Unknown(tag) => Err(PrintError::Malformed(tag.clone())),
        }
    }

    fn list_literal(&self, chain: &sugar::ConsChain) -> Result<Document, PrintError> {
        let mut docs = Vec::new();
        for elem in &chain.elements {
            docs.push(self.expression(elem, false)?);
        }
        if let Some(tail) = chain.tail {
            docs.push(self.expression(tail, false)?);
        }
        Ok(text("[")
            .append(join(docs, text(";").append(RcDoc::line())).nest(1))
            .append(text("]"))
            .group())
    }

    fn infix_operand(
        &self,
        parent: &InfixApp,
        side: Side,
        operand: &Expression,
    ) -> Result<Document, PrintError> {
        let wrap = sugar::operand_needs_parens(parent, side, operand);
        let doc = self.expression(operand, false)?;
        Ok(maybe_parens(wrap, doc))
    }

    fn argument(&self, label: &ArgLabel, arg: &Expression) -> Result<Document, PrintError> {
        let doc = self.expression(arg, true)?;
        Ok(match label {
            ArgLabel::None => doc,
            ArgLabel::Labelled(name) => text(&format!("~{}:", name)).append(doc),
            ArgLabel::Optional(name) => text(&format!("?{}:", name)).append(doc),
        })
    }

    fn cases(&self, cases: &[Case]) -> Result<Document, PrintError> {
        let mut docs = Vec::new();
        for case in cases {
            docs.push(self.case(case)?);
        }
        Ok(join(docs, RcDoc::line().append(text("| "))))
    }

    fn case(&self, case: &Case) -> Result<Document, PrintError> {
        let mut doc = self.pattern(&case.lhs)?;
        if let Some(guard) = &case.guard {
            doc = doc
                .append(text(" when "))
                .append(self.expression(guard, false)?);
        }
        Ok(doc
            .append(text(" ->"))
            .append(RcDoc::line().append(self.expression(&case.rhs, false)?).nest(2))
            .group())
    }

    fn function_param(&self, param: &FunctionParam) -> Result<Document, PrintError> {
        match param {
            FunctionParam::Value {
                label,
                default,
                pattern,
            } => match label {
                ArgLabel::None => self.pattern(pattern),
                ArgLabel::Labelled(_) => Ok(text("~").append(self.pattern(pattern)?)),
                ArgLabel::Optional(_) => match default {
                    Some(default) => Ok(text("?(")
                        .append(self.pattern(pattern)?)
                        .append(text(" = "))
                        .append(self.expression(default, false)?)
                        .append(text(")"))),
                    None => Ok(text("?").append(self.pattern(pattern)?)),
                },
            },
            FunctionParam::NewType(name) => {
                Ok(text("(type ").append(text(name)).append(text(")")))
            }
        }
    }

    fn function_body(&self, body: &FunctionBody) -> Result<Document, PrintError> {
        match body {
            FunctionBody::Expression(expr) => self.expression(expr, false),
            FunctionBody::Cases(_) => Err(PrintError::Unsupported("function with cases")),
        }
    }

    fn binding_op(&self, op: &BindingOp) -> Result<Document, PrintError> {
        Ok(text(&op.op)
            .append(space())
            .append(self.pattern(&op.pattern)?)
            .append(text(" = "))
            .append(self.expression(&op.expr, false)?))
    }

    pub fn pattern(&self, pattern: &Pattern) -> Result<Document, PrintError> {
        let mut doc = self.pattern_desc(&pattern.desc)?;
        for attr in &pattern.attributes {
            if attr.name != sugar::BLOCK_COMMENT {
                doc = doc.append(space()).append(self.attribute(attr, 1)?);
            }
        }
        Ok(doc)
    }

    fn pattern_desc(&self, desc: &PatternDesc) -> Result<Document, PrintError> {
        match desc {
            PatternDesc::Any => Ok(text("_")),
            PatternDesc::Var(name) => Ok(text(name)),
            PatternDesc::Alias(pattern, name) => Ok(self
                .pattern(pattern)?
                .append(text(" as "))
                .append(text(name))),
            PatternDesc::Constant(constant) => Ok(self.constant(constant)),
            PatternDesc::Interval(low, high) => Ok(self
                .constant(low)
                .append(text(".."))
                .append(self.constant(high))),
            PatternDesc::Tuple(elems) => {
                let mut docs = Vec::new();
                for elem in elems {
                    docs.push(self.pattern(elem)?);
                }
                Ok(text("(")
                    .append(join(docs, text(", ")))
                    .append(text(")")))
            }
            PatternDesc::Construct(lid, arg) => {
                let mut doc = self.longident(lid);
                if let Some(arg) = arg {
                    if !arg.newtypes.is_empty() {
                        let names: Vec<Document> =
                            arg.newtypes.iter().map(|n| text(n)).collect();
                        doc = doc
                            .append(text(" (type "))
                            .append(join(names, space()))
                            .append(text(")"));
                    }
                    doc = doc.append(space()).append(self.pattern(&arg.pattern)?);
                }
                Ok(doc)
            }
            PatternDesc::Variant(label, arg) => {
                let mut doc = text("`").append(text(label));
                if let Some(arg) = arg {
                    doc = doc.append(space()).append(self.pattern(arg)?);
                }
                Ok(doc)
            }
            PatternDesc::Record(fields, closed) => {
                let mut docs = Vec::new();
                for (lid, pattern) in fields {
                    docs.push(
                        self.longident(lid)
                            .append(text(" = "))
                            .append(self.pattern(pattern)?),
                    );
                }
                if *closed == ClosedFlag::Open {
                    docs.push(text("_"));
                }
                Ok(text("{ ")
                    .append(join(docs, text("; ")))
                    .append(text(" }")))
            }
            PatternDesc::Array(elems) => {
                let mut docs = Vec::new();
                for elem in elems {
                    docs.push(self.pattern(elem)?);
                }
                Ok(text("[| ")
                    .append(join(docs, text("; ")))
                    .append(text(" |]")))
            }
            PatternDesc::Or(left, right) => Ok(self
                .pattern(left)?
                .append(text(" | "))
                .append(self.pattern(right)?)),
            PatternDesc::Constraint(pattern, typ) => Ok(parens(
                self.pattern(pattern)?
                    .append(text(" : "))
                    .append(self.core_type(typ)?),
            )),
            PatternDesc::Type(lid) => Ok(text("#").append(self.longident(lid))),
            PatternDesc::Lazy(pattern) => Ok(text("lazy ").append(self.pattern(pattern)?)),
            PatternDesc::Unpack(name) => Ok(text("(module ")
                .append(text(name.as_deref().unwrap_or("_")))
                .append(text(")"))),
            PatternDesc::Exception(pattern) => {
                Ok(text("exception ").append(self.pattern(pattern)?))
            }
            PatternDesc::Effect(effect, continuation) => Ok(text("effect ")
                .append(self.pattern(effect)?)
                .append(space())
                .append(self.pattern(continuation)?)),
            PatternDesc::Extension(ext) => self.extension(ext),
            PatternDesc::Open(lid, pattern) => Ok(self
                .longident(lid)
                .append(text(".("))
                .append(self.pattern(pattern)?)
                .append(text(")"))),
            PatternDesc::Unknown(tag) => Err(PrintError::Malformed(tag.clone())),
        }
    }

    pub fn core_type(&self, typ: &CoreType) -> Result<Document, PrintError> {
        let mut doc = self.core_type_desc(&typ.desc)?;
        for attr in &typ.attributes {
            if attr.name != sugar::BLOCK_COMMENT {
                doc = doc.append(space()).append(self.attribute(attr, 1)?);
            }
        }
        Ok(doc)
    }

    fn core_type_desc(&self, desc: &CoreTypeDesc) -> Result<Document, PrintError> {
        match desc {
            CoreTypeDesc::Any => Ok(text("_")),
            CoreTypeDesc::Var(name) => Ok(text("'").append(text(name))),
            CoreTypeDesc::Arrow(label, from, to) => {
                let prefix = match label {
                    ArgLabel::None => RcDoc::nil(),
                    ArgLabel::Labelled(name) => text(&format!("~{}:", name)),
                    ArgLabel::Optional(name) => text(&format!("?{}:", name)),
                };
                Ok(prefix
                    .append(self.core_type(from)?)
                    .append(text(" ->"))
                    .append(RcDoc::line().append(self.core_type(to)?))
                    .group())
            }
            CoreTypeDesc::Tuple(elems) => {
                let mut docs = Vec::new();
                for elem in elems {
                    docs.push(self.core_type(elem)?);
                }
                Ok(join(docs, text(" * ")))
            }
            CoreTypeDesc::Constr(lid, args) => match args.as_slice() {
                [] => Ok(self.longident(lid)),
                [arg] => Ok(self
                    .core_type(arg)?
                    .append(space())
                    .append(self.longident(lid))),
                _ => {
                    let mut docs = Vec::new();
                    for arg in args {
                        docs.push(self.core_type(arg)?);
                    }
                    Ok(text("(")
                        .append(join(docs, text(", ")))
                        .append(text(") "))
                        .append(self.longident(lid)))
                }
            },
            CoreTypeDesc::Alias(typ, name) => Ok(self
                .core_type(typ)?
                .append(text(" as '"))
                .append(text(name))),
            CoreTypeDesc::Object => Err(PrintError::Unsupported("object type")),
            CoreTypeDesc::Class => Err(PrintError::Unsupported("class type")),
            CoreTypeDesc::Variant => Err(PrintError::Unsupported("polymorphic variant type")),
            CoreTypeDesc::Poly => Err(PrintError::Unsupported("polymorphic type")),
            CoreTypeDesc::Package => Err(PrintError::Unsupported("package type")),
            CoreTypeDesc::Open => Err(PrintError::Unsupported("open type constructor")),
            CoreTypeDesc::Extension => Err(PrintError::Unsupported("type extension point")),
            CoreTypeDesc::Unknown(tag) => Err(PrintError::Malformed(tag.clone())),
        }
    }

    fn extension(&self, ext: &Extension) -> Result<Document, PrintError> {
        let mut doc = text("[%").append(text(&ext.name));
        if let Some(payload) = self.payload(&ext.payload)? {
            doc = doc.append(space()).append(payload);
        }
        Ok(doc.append(text("]")))
    }

    fn payload(&self, payload: &Payload) -> Result<Option<Document>, PrintError> {
        match payload {
            Payload::Structure(items) if items.is_empty() => Ok(None),
            Payload::Structure(items) => {
                let mut docs = Vec::new();
                for item in items {
                    docs.push(self.structure_item(item)?);
                }
                Ok(Some(join(docs, RcDoc::line())))
            }
            Payload::Signature => Err(PrintError::Unsupported("signature payload")),
            Payload::Type => Err(PrintError::Unsupported("type payload")),
            Payload::Pattern => Err(PrintError::Unsupported("pattern payload")),
        }
    }

    fn attribute(&self, attr: &Attribute, level: usize) -> Result<Document, PrintError> {
        if attr.name == sugar::BLOCK_COMMENT {
            if let Some(body) = attr.raw_text() {
                return Ok(self.comment_text("(*", body));
            }
        }
        if attr.name == sugar::DOC_COMMENT || attr.name == sugar::TEXT_COMMENT {
            if let Some(body) = attr.raw_text() {
                return Ok(self.comment_text("(**", body));
            }
        }
        if level == 3 && attr.name == "import" {
            return self.import_attribute(attr);
        }
        let marker = "@".repeat(level);
        let mut doc = text("[").append(text(&marker)).append(text(&attr.name));
        if let Some(payload) = self.payload(&attr.payload)? {
            doc = doc.append(space()).append(payload);
        }
        Ok(doc.append(text("]")))
    }

    /// `[@@@import Mod, "file"]`: the payload is a pair expression but it
    /// renders without the tuple parentheses.
    fn import_attribute(&self, attr: &Attribute) -> Result<Document, PrintError> {
        if let Payload::Structure(items) = &attr.payload {
            if let [item] = items.as_slice() {
                if let StructureItemDesc::Eval(expr, _) = &item.desc {
                    if let ExpressionDesc::Tuple(pair) = &expr.desc {
                        if let [module, file] = pair.as_slice() {
                            return Ok(text("[@@@import ")
                                .append(self.expression(module, false)?)
                                .append(text(", "))
                                .append(self.expression(file, false)?)
                                .append(text("]")));
                        }
                    }
                }
            }
        }
        Err(PrintError::Malformed("import attribute".to_string()))
    }

    fn comment_text(&self, opener: &str, body: &str) -> Document {
        let words: Vec<Document> = body.split_whitespace().map(text).collect();
        text(opener)
            .append(space())
            .append(join(words, RcDoc::softline()))
            .append(space())
            .append(text("*)"))
            .group()
    }

    /// Block comments attached to a declaration print above it, one per
    /// line, in attribute order.
    fn leading_comments(&self, attrs: &[Attribute]) -> Document {
        let mut doc = RcDoc::nil();
        for attr in attrs {
            if attr.name == sugar::BLOCK_COMMENT {
                if let Some(body) = attr.raw_text() {
                    doc = doc
                        .append(self.comment_text("(*", body))
                        .append(RcDoc::hardline());
                }
            }
        }
        doc
    }

    /// Declaration-level attributes, each on its own line below the body.
    fn attribute_lines(
        &self,
        attrs: &[&Attribute],
        level: usize,
    ) -> Result<Document, PrintError> {
        let mut doc = RcDoc::nil();
        for attr in attrs {
            if attr.name == sugar::BLOCK_COMMENT {
                continue;
            }
            doc = doc
                .append(RcDoc::hardline())
                .append(self.attribute(attr, level)?);
        }
        Ok(doc)
    }

    fn constant(&self, constant: &Constant) -> Document {
        match constant {
            Constant::Integer(repr, suffix) | Constant::Float(repr, suffix) => match suffix {
                Some(c) => text(&format!("{}{}", repr, c)),
                None => text(repr),
            },
            Constant::Char(c) => text(&format!("'{}'", c)),
            Constant::String(s, None) => text(&format!("\"{}\"", s)),
            Constant::String(s, Some(delim)) => {
                text(&format!("{{{}|{}|{}}}", delim, s, delim))
            }
        }
    }

    fn longident(&self, lid: &Longident) -> Document {
        match lid {
            Longident::Ident(name) => text(name),
            Longident::Dot(prefix, name) => self
                .longident(prefix)
                .append(text("."))
                .append(text(name)),
            Longident::Apply(func, arg) => self
                .longident(func)
                .append(text("("))
                .append(self.longident(arg))
                .append(text(")")),
        }
    }
}

#[cfg(test)]
mod verify {
    use super::*;

    fn render(doc: Document) -> String {
        doc.pretty(80).to_string()
    }

    fn printer() -> Printer<'static> {
        Printer::new("", Options::default())
    }

    fn expr(desc: ExpressionDesc) -> Expression {
        Expression {
            desc,
            span: Span::default(),
            attributes: vec![],
        }
    }

    fn var(name: &str) -> Expression {
        expr(ExpressionDesc::Ident(Longident::ident(name)))
    }

    fn int(value: &str) -> Expression {
        expr(ExpressionDesc::Constant(Constant::Integer(
            value.to_string(),
            None,
        )))
    }

    fn infix(op: &str, lhs: Expression, rhs: Expression) -> Expression {
        expr(ExpressionDesc::Apply(
            Box::new(var(op)),
            vec![(ArgLabel::None, lhs), (ArgLabel::None, rhs)],
        ))
    }

    #[test]
    fn identifiers_and_constants() {
        let p = printer();
        assert_eq!(render(p.expression(&var("x"), false).unwrap()), "x");
        assert_eq!(render(p.expression(&int("42"), false).unwrap()), "42");
    }

    #[test]
    fn qualified_identifier() {
        let p = printer();
        let e = expr(ExpressionDesc::Ident(Longident::dot("List", "map")));
        assert_eq!(render(p.expression(&e, false).unwrap()), "List.map");
    }

    #[test]
    fn redundant_parentheses_dropped() {
        // ((x - 1) * (y + 1)) + 1 prints as (x - 1) * (y + 1) + 1
        let product = infix(
            "*",
            infix("-", var("x"), int("1")),
            infix("+", var("y"), int("1")),
        );
        let sum = infix("+", product, int("1"));
        let p = printer();
        assert_eq!(
            render(p.expression(&sum, false).unwrap()),
            "(x - 1) * (y + 1) + 1"
        );
    }

    #[test]
    fn right_associative_conjunction() {
        let conj = infix(
            "&&",
            infix(">", var("a"), var("b")),
            infix("&&", infix(">", var("c"), var("d")), var("e")),
        );
        let p = printer();
        assert_eq!(
            render(p.expression(&conj, false).unwrap()),
            "a > b && c > d && e"
        );
    }

    #[test]
    fn application_argument_parenthesized() {
        let inner = expr(ExpressionDesc::Apply(
            Box::new(var("g")),
            vec![(ArgLabel::None, var("x"))],
        ));
        let outer = expr(ExpressionDesc::Apply(
            Box::new(var("f")),
            vec![(ArgLabel::None, inner)],
        ));
        let p = printer();
        assert_eq!(render(p.expression(&outer, false).unwrap()), "f (g x)");
    }

    #[test]
    fn labelled_arguments() {
        let call = expr(ExpressionDesc::Apply(
            Box::new(var("f")),
            vec![
                (ArgLabel::Labelled("x".to_string()), int("1")),
                (ArgLabel::Optional("y".to_string()), int("2")),
            ],
        ));
        let p = printer();
        assert_eq!(render(p.expression(&call, false).unwrap()), "f ~x:1 ?y:2");
    }

    fn cons(head: Expression, rest: Expression) -> Expression {
        expr(ExpressionDesc::Construct(
            Longident::ident("::"),
            Some(Box::new(expr(ExpressionDesc::Tuple(vec![head, rest])))),
        ))
    }

    fn nil() -> Expression {
        expr(ExpressionDesc::Construct(Longident::ident("[]"), None))
    }

    #[test]
    fn list_sugar() {
        let list = cons(int("1"), cons(int("2"), cons(int("3"), nil())));
        let p = printer();
        assert_eq!(render(p.expression(&list, false).unwrap()), "[1; 2; 3]");
    }

    #[test]
    fn list_with_expression_tail() {
        let list = cons(int("1"), cons(int("2"), var("rest")));
        let p = printer();
        assert_eq!(render(p.expression(&list, false).unwrap()), "[1; 2; rest]");
    }

    #[test]
    fn empty_list_is_a_plain_constructor() {
        let p = printer();
        assert_eq!(render(p.expression(&nil(), false).unwrap()), "[]");
    }

    #[test]
    fn conditional_expression() {
        let e = expr(ExpressionDesc::IfThenElse(
            Box::new(infix(">", var("x"), int("0"))),
            Box::new(var("x")),
            Some(Box::new(int("0"))),
        ));
        let p = printer();
        assert_eq!(
            render(p.expression(&e, false).unwrap()),
            "if x > 0 then x else 0"
        );
    }

    #[test]
    fn match_expression() {
        let cases = vec![
            Case {
                lhs: Pattern {
                    desc: PatternDesc::Construct(Longident::ident("[]"), None),
                    span: Span::default(),
                    attributes: vec![],
                },
                guard: None,
                rhs: int("0"),
            },
            Case {
                lhs: Pattern {
                    desc: PatternDesc::Any,
                    span: Span::default(),
                    attributes: vec![],
                },
                guard: None,
                rhs: int("1"),
            },
        ];
        let e = expr(ExpressionDesc::Match(Box::new(var("xs")), cases));
        let p = printer();
        assert_eq!(
            render(p.expression(&e, false).unwrap()),
            "match xs with [] -> 0 | _ -> 1"
        );
    }

    #[test]
    fn record_expression() {
        let fields = vec![
            (Longident::ident("x"), int("1")),
            (Longident::ident("y"), int("2")),
        ];
        let e = expr(ExpressionDesc::Record(fields, None));
        let p = printer();
        assert_eq!(
            render(p.expression(&e, false).unwrap()),
            "{ x = 1; y = 2 }"
        );
    }

    #[test]
    fn record_update_expression() {
        let fields = vec![(Longident::ident("x"), int("1"))];
        let e = expr(ExpressionDesc::Record(fields, Some(Box::new(var("r")))));
        let p = printer();
        assert_eq!(render(p.expression(&e, false).unwrap()), "{ r with x = 1 }");
    }

    #[test]
    fn array_expression() {
        let e = expr(ExpressionDesc::Array(vec![int("1"), int("2")]));
        let p = printer();
        assert_eq!(render(p.expression(&e, false).unwrap()), "[| 1; 2 |]");
    }

    #[test]
    fn binding_operator_expression() {
        let letop = LetOp {
            binding: BindingOp {
                op: "let*".to_string(),
                pattern: Pattern {
                    desc: PatternDesc::Var("x".to_string()),
                    span: Span::default(),
                    attributes: vec![],
                },
                expr: var("action"),
            },
            ands: vec![],
            body: Box::new(var("x")),
        };
        let e = expr(ExpressionDesc::LetOp(Box::new(letop)));
        let p = printer();
        assert_eq!(
            render(p.expression(&e, false).unwrap()),
            "let* x = action in\nx"
        );
    }

    #[test]
    fn unknown_expression_is_malformed() {
        let e = expr(ExpressionDesc::Unknown("Pexp_hole".to_string()));
        let p = printer();
        assert!(matches!(
            p.expression(&e, false),
            Err(PrintError::Malformed(_))
        ));
    }

    #[test]
    fn constrained_pattern() {
        let pat = Pattern {
            desc: PatternDesc::Constraint(
                Box::new(Pattern {
                    desc: PatternDesc::Var("y".to_string()),
                    span: Span::default(),
                    attributes: vec![],
                }),
                Box::new(CoreType {
                    desc: CoreTypeDesc::Constr(Longident::ident("int"), vec![]),
                    span: Span::default(),
                    attributes: vec![],
                }),
            ),
            span: Span::default(),
            attributes: vec![],
        };
        let p = printer();
        assert_eq!(render(p.pattern(&pat).unwrap()), "(y : int)");
    }

    #[test]
    fn single_argument_type_constructor() {
        let typ = CoreType {
            desc: CoreTypeDesc::Constr(
                Longident::ident("option"),
                vec![CoreType {
                    desc: CoreTypeDesc::Constr(Longident::ident("bool"), vec![]),
                    span: Span::default(),
                    attributes: vec![],
                }],
            ),
            span: Span::default(),
            attributes: vec![],
        };
        let p = printer();
        assert_eq!(render(p.core_type(&typ).unwrap()), "bool option");
    }

    #[test]
    fn numeric_literal_keeps_source_spelling() {
        let source = "let x = 0x10";
        let constant = Expression {
            desc: ExpressionDesc::Constant(Constant::Integer("16".to_string(), None)),
            span: Span::new(8, 12),
            attributes: vec![],
        };
        let call = expr(ExpressionDesc::Apply(
            Box::new(expr(ExpressionDesc::Ident(Longident::dot(
                "Z",
                "of_nativeint",
            )))),
            vec![(ArgLabel::None, constant)],
        ));
        let p = Printer::new(source, Options::default());
        assert_eq!(render(p.expression(&call, false).unwrap()), "0x10");
    }
}
