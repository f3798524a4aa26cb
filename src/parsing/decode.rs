//! Decoding the parser's JSON parsetree into the syntax-tree types
//!
//! Unrecognized discriminant tags on the open-ended categories become
//! `Unknown` nodes rather than decode failures, so one exotic construct in
//! a file degrades to verbatim output for its phrase instead of rejecting
//! the whole file. Missing fields and shape mismatches are real failures.

use serde_json::Value;

use super::ParsingError;
use crate::language::*;

type Result<T> = std::result::Result<T, ParsingError>;

fn field<'a>(value: &'a Value, name: &'static str) -> Result<&'a Value> {
    value.get(name).ok_or(ParsingError::MissingField(name))
}

/// Variants arrive as `["Tag", args...]`, or occasionally as a bare string
/// for nullary constructors.
fn variant(value: &Value) -> Result<(&str, Vec<&Value>)> {
    match value {
        Value::String(tag) => Ok((tag.as_str(), Vec::new())),
        Value::Array(items) => match items.first() {
            Some(Value::String(tag)) => Ok((tag.as_str(), items[1..].iter().collect())),
            _ => Err(ParsingError::UnexpectedShape(
                "variant without a tag".to_string(),
            )),
        },
        _ => Err(ParsingError::UnexpectedShape(format!(
            "expected a variant, found {}",
            value
        ))),
    }
}

fn arg<'a>(args: &[&'a Value], index: usize, what: &'static str) -> Result<&'a Value> {
    args.get(index)
        .copied()
        .ok_or(ParsingError::MissingField(what))
}

fn pair<'a>(value: &'a Value, what: &'static str) -> Result<(&'a Value, &'a Value)> {
    match value {
        Value::Array(items) if items.len() >= 2 => Ok((&items[0], &items[1])),
        _ => Err(ParsingError::UnexpectedShape(format!(
            "expected a pair for {}",
            what
        ))),
    }
}

fn elements<'a>(value: &'a Value, what: &'static str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        ParsingError::UnexpectedShape(format!("expected an array for {}", what))
    })
}

fn string_of(value: &Value, what: &'static str) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        ParsingError::UnexpectedShape(format!("expected a string for {}", what))
    })
}

fn opt(value: &Value) -> Option<&Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn offset(value: &Value) -> usize {
    // Ghost locations carry -1; clamp them to the start of the buffer.
    value.as_i64().unwrap_or(0).max(0) as usize
}

fn span(value: &Value) -> Result<Span> {
    let start = offset(field(field(value, "loc_start")?, "pos_cnum")?);
    let end = offset(field(field(value, "loc_end")?, "pos_cnum")?);
    Ok(Span::new(start, end))
}

fn string_loc(value: &Value) -> Result<String> {
    string_of(field(value, "txt")?, "txt")
}

fn opt_string_loc(value: &Value) -> Result<Option<String>> {
    match opt(field(value, "txt")?) {
        Some(txt) => Ok(Some(string_of(txt, "txt")?)),
        None => Ok(None),
    }
}

fn char_of(value: &Value, what: &'static str) -> Result<char> {
    if let Some(s) = value.as_str() {
        if let Some(c) = s.chars().next() {
            return Ok(c);
        }
    }
    if let Some(code) = value.as_u64() {
        if let Some(c) = char::from_u32(code as u32) {
            return Ok(c);
        }
    }
    Err(ParsingError::UnexpectedShape(format!(
        "expected a character for {}",
        what
    )))
}

fn suffix_of(value: &Value) -> Option<char> {
    value.as_str().and_then(|s| s.chars().next())
}

pub fn program(value: &Value) -> Result<Program> {
    let items = elements(value, "program")?;
    let mut phrases = Vec::new();
    for item in items {
        phrases.push(toplevel_phrase(item)?);
    }
    Ok(Program { phrases })
}

fn toplevel_phrase(value: &Value) -> Result<Phrase> {
    let (tag, args) = variant(value)?;
    match tag {
        "Ptop_def" => Ok(Phrase::Definitions(structure(arg(
            &args,
            0,
            "Ptop_def structure",
        )?)?)),
        "Ptop_dir" => Ok(Phrase::Directive(directive(arg(
            &args,
            0,
            "Ptop_dir directive",
        )?)?)),
        _ => Err(ParsingError::UnexpectedShape(format!(
            "toplevel phrase {}",
            tag
        ))),
    }
}

fn structure(value: &Value) -> Result<Vec<StructureItem>> {
    let items = elements(value, "structure")?;
    let mut result = Vec::new();
    for item in items {
        result.push(structure_item(item)?);
    }
    Ok(result)
}

fn structure_item(value: &Value) -> Result<StructureItem> {
    Ok(StructureItem {
        desc: structure_item_desc(field(value, "pstr_desc")?)?,
        span: span(field(value, "pstr_loc")?)?,
    })
}

fn structure_item_desc(value: &Value) -> Result<StructureItemDesc> {
    let (tag, args) = variant(value)?;
    match tag {
        "Pstr_eval" => Ok(StructureItemDesc::Eval(
            expression(arg(&args, 0, "Pstr_eval expression")?)?,
            attributes(arg(&args, 1, "Pstr_eval attributes")?)?,
        )),
        "Pstr_value" => {
            let flag = rec_flag(arg(&args, 0, "Pstr_value flag")?)?;
            let items = elements(arg(&args, 1, "Pstr_value bindings")?, "bindings")?;
            let mut bindings = Vec::new();
            for item in items {
                bindings.push(value_binding(item)?);
            }
            Ok(StructureItemDesc::Value(flag, bindings))
        }
        "Pstr_primitive" => Ok(StructureItemDesc::Primitive(value_description(arg(
            &args,
            0,
            "Pstr_primitive description",
        )?)?)),
        "Pstr_type" => {
            let flag = rec_flag(arg(&args, 0, "Pstr_type flag")?)?;
            let items = elements(arg(&args, 1, "Pstr_type declarations")?, "declarations")?;
            let mut decls = Vec::new();
            for item in items {
                decls.push(type_declaration(item)?);
            }
            Ok(StructureItemDesc::Type(flag, decls))
        }
        "Pstr_typext" => Ok(StructureItemDesc::TypeExt),
        "Pstr_exception" => Ok(StructureItemDesc::Exception(type_exception(arg(
            &args,
            0,
            "Pstr_exception",
        )?)?)),
        "Pstr_module" => Ok(StructureItemDesc::Module(module_binding(arg(
            &args,
            0,
            "Pstr_module binding",
        )?)?)),
        "Pstr_recmodule" => Ok(StructureItemDesc::RecModule),
        "Pstr_modtype" => Ok(StructureItemDesc::ModType),
        "Pstr_open" => Ok(StructureItemDesc::Open(open_declaration(arg(
            &args,
            0,
            "Pstr_open declaration",
        )?)?)),
        "Pstr_class" => Ok(StructureItemDesc::Class),
        "Pstr_class_type" => Ok(StructureItemDesc::ClassType),
        "Pstr_include" => Ok(StructureItemDesc::Include),
        "Pstr_attribute" => Ok(StructureItemDesc::Attribute(attribute(arg(
            &args,
            0,
            "Pstr_attribute",
        )?)?)),
        "Pstr_extension" => Ok(StructureItemDesc::Extension),
        _ => Ok(StructureItemDesc::Unknown(tag.to_string())),
    }
}

fn rec_flag(value: &Value) -> Result<RecFlag> {
    let (tag, _) = variant(value)?;
    Ok(if tag == "Recursive" {
        RecFlag::Recursive
    } else {
        RecFlag::Nonrecursive
    })
}

fn closed_flag(value: &Value) -> Result<ClosedFlag> {
    let (tag, _) = variant(value)?;
    Ok(if tag == "Open" {
        ClosedFlag::Open
    } else {
        ClosedFlag::Closed
    })
}

fn value_binding(value: &Value) -> Result<ValueBinding> {
    Ok(ValueBinding {
        pattern: pattern(field(value, "pvb_pat")?)?,
        expr: expression(field(value, "pvb_expr")?)?,
        attributes: attributes(field(value, "pvb_attributes")?)?,
        span: span(field(value, "pvb_loc")?)?,
    })
}

fn attributes(value: &Value) -> Result<Vec<Attribute>> {
    let items = elements(value, "attributes")?;
    let mut result = Vec::new();
    for item in items {
        result.push(attribute(item)?);
    }
    Ok(result)
}

fn attribute(value: &Value) -> Result<Attribute> {
    Ok(Attribute {
        name: string_loc(field(value, "attr_name")?)?,
        payload: payload(field(value, "attr_payload")?)?,
        span: span(field(value, "attr_loc")?)?,
    })
}

fn payload(value: &Value) -> Result<Payload> {
    let (tag, args) = variant(value)?;
    match tag {
        "PStr" => Ok(Payload::Structure(structure(arg(
            &args,
            0,
            "PStr structure",
        )?)?)),
        "PSig" => Ok(Payload::Signature),
        "PTyp" => Ok(Payload::Type),
        "PPat" => Ok(Payload::Pattern),
        _ => Err(ParsingError::UnexpectedShape(format!("payload {}", tag))),
    }
}

fn arg_label(value: &Value) -> Result<ArgLabel> {
    let (tag, args) = variant(value)?;
    match tag {
        "Nolabel" => Ok(ArgLabel::None),
        "Labelled" => Ok(ArgLabel::Labelled(string_of(
            arg(&args, 0, "Labelled name")?,
            "label",
        )?)),
        "Optional" => Ok(ArgLabel::Optional(string_of(
            arg(&args, 0, "Optional name")?,
            "label",
        )?)),
        _ => Err(ParsingError::UnexpectedShape(format!("arg label {}", tag))),
    }
}

fn constant(value: &Value) -> Result<Constant> {
    let desc = match value.get("pconst_desc") {
        Some(desc) => desc,
        None => value,
    };
    let (tag, args) = variant(desc)?;
    match tag {
        "Pconst_integer" => Ok(Constant::Integer(
            string_of(arg(&args, 0, "integer text")?, "integer")?,
            args.get(1).and_then(|v| suffix_of(v)),
        )),
        "Pconst_char" => Ok(Constant::Char(char_of(
            arg(&args, 0, "character")?,
            "character",
        )?)),
        "Pconst_string" => {
            let text = string_of(arg(&args, 0, "string text")?, "string")?;
            let delim = match args.get(2).copied().and_then(opt) {
                Some(delim) => Some(string_of(delim, "string delimiter")?),
                None => None,
            };
            Ok(Constant::String(text, delim))
        }
        "Pconst_float" => Ok(Constant::Float(
            string_of(arg(&args, 0, "float text")?, "float")?,
            args.get(1).and_then(|v| suffix_of(v)),
        )),
        _ => Err(ParsingError::UnexpectedShape(format!("constant {}", tag))),
    }
}

fn longident(value: &Value) -> Result<Longident> {
    let (tag, args) = variant(value)?;
    match tag {
        "Lident" => Ok(Longident::Ident(string_of(
            arg(&args, 0, "Lident name")?,
            "identifier",
        )?)),
        "Ldot" => Ok(Longident::Dot(
            Box::new(longident(arg(&args, 0, "Ldot prefix")?)?),
            string_of(arg(&args, 1, "Ldot name")?, "identifier")?,
        )),
        "Lapply" => Ok(Longident::Apply(
            Box::new(longident(arg(&args, 0, "Lapply functor")?)?),
            Box::new(longident(arg(&args, 1, "Lapply argument")?)?),
        )),
        _ => Err(ParsingError::UnexpectedShape(format!("longident {}", tag))),
    }
}

fn longident_loc(value: &Value) -> Result<Longident> {
    longident(field(value, "txt")?)
}

pub fn expression(value: &Value) -> Result<Expression> {
    Ok(Expression {
        desc: expression_desc(field(value, "pexp_desc")?)?,
        span: span(field(value, "pexp_loc")?)?,
        attributes: attributes(field(value, "pexp_attributes")?)?,
    })
}

fn expression_box(value: &Value) -> Result<Box<Expression>> {
    Ok(Box::new(expression(value)?))
}

fn expression_list(value: &Value, what: &'static str) -> Result<Vec<Expression>> {
    let items = elements(value, what)?;
    let mut result = Vec::new();
    for item in items {
        result.push(expression(item)?);
    }
    Ok(result)
}

fn expression_desc(value: &Value) -> Result<ExpressionDesc> {
    let (tag, args) = variant(value)?;
    match tag {
        "Pexp_ident" => Ok(ExpressionDesc::Ident(longident_loc(arg(
            &args,
            0,
            "Pexp_ident",
        )?)?)),
        "Pexp_constant" => Ok(ExpressionDesc::Constant(constant(arg(
            &args,
            0,
            "Pexp_constant",
        )?)?)),
        "Pexp_let" => {
            let flag = rec_flag(arg(&args, 0, "Pexp_let flag")?)?;
            let items = elements(arg(&args, 1, "Pexp_let bindings")?, "bindings")?;
            let mut bindings = Vec::new();
            for item in items {
                bindings.push(value_binding(item)?);
            }
            Ok(ExpressionDesc::Let(
                flag,
                bindings,
                expression_box(arg(&args, 2, "Pexp_let body")?)?,
            ))
        }
        "Pexp_function" => {
            let items = elements(arg(&args, 0, "Pexp_function params")?, "params")?;
            let mut params = Vec::new();
            for item in items {
                params.push(function_param(item)?);
            }
            Ok(ExpressionDesc::Function(
                params,
                function_body(arg(&args, 2, "Pexp_function body")?)?,
            ))
        }
        "Pexp_apply" => {
            let callee = expression_box(arg(&args, 0, "Pexp_apply callee")?)?;
            let items = elements(arg(&args, 1, "Pexp_apply arguments")?, "arguments")?;
            let mut arguments = Vec::new();
            for item in items {
                let (label, value) = pair(item, "application argument")?;
                arguments.push((arg_label(label)?, expression(value)?));
            }
            Ok(ExpressionDesc::Apply(callee, arguments))
        }
        "Pexp_match" => Ok(ExpressionDesc::Match(
            expression_box(arg(&args, 0, "Pexp_match scrutinee")?)?,
            cases(arg(&args, 1, "Pexp_match cases")?)?,
        )),
        "Pexp_try" => Ok(ExpressionDesc::Try(
            expression_box(arg(&args, 0, "Pexp_try body")?)?,
            cases(arg(&args, 1, "Pexp_try cases")?)?,
        )),
        "Pexp_tuple" => Ok(ExpressionDesc::Tuple(expression_list(
            arg(&args, 0, "Pexp_tuple elements")?,
            "tuple",
        )?)),
        "Pexp_construct" => {
            let lid = longident_loc(arg(&args, 0, "Pexp_construct name")?)?;
            let argument = match arg(&args, 1, "Pexp_construct argument").ok().and_then(opt) {
                Some(value) => Some(expression_box(value)?),
                None => None,
            };
            Ok(ExpressionDesc::Construct(lid, argument))
        }
        "Pexp_variant" => {
            let label = string_of(arg(&args, 0, "Pexp_variant label")?, "variant label")?;
            let argument = match arg(&args, 1, "Pexp_variant argument").ok().and_then(opt) {
                Some(value) => Some(expression_box(value)?),
                None => None,
            };
            Ok(ExpressionDesc::Variant(label, argument))
        }
        "Pexp_record" => {
            let items = elements(arg(&args, 0, "Pexp_record fields")?, "fields")?;
            let mut fields = Vec::new();
            for item in items {
                let (lid, value) = pair(item, "record field")?;
                fields.push((longident_loc(lid)?, expression(value)?));
            }
            let base = match arg(&args, 1, "Pexp_record base").ok().and_then(opt) {
                Some(value) => Some(expression_box(value)?),
                None => None,
            };
            Ok(ExpressionDesc::Record(fields, base))
        }
        "Pexp_field" => Ok(ExpressionDesc::Field(
            expression_box(arg(&args, 0, "Pexp_field record")?)?,
            longident_loc(arg(&args, 1, "Pexp_field name")?)?,
        )),
        "Pexp_setfield" => Ok(ExpressionDesc::SetField(
            expression_box(arg(&args, 0, "Pexp_setfield record")?)?,
            longident_loc(arg(&args, 1, "Pexp_setfield name")?)?,
            expression_box(arg(&args, 2, "Pexp_setfield value")?)?,
        )),
        "Pexp_array" => Ok(ExpressionDesc::Array(expression_list(
            arg(&args, 0, "Pexp_array elements")?,
            "array",
        )?)),
        "Pexp_ifthenelse" => {
            let otherwise = match arg(&args, 2, "Pexp_ifthenelse else").ok().and_then(opt) {
                Some(value) => Some(expression_box(value)?),
                None => None,
            };
            Ok(ExpressionDesc::IfThenElse(
                expression_box(arg(&args, 0, "Pexp_ifthenelse condition")?)?,
                expression_box(arg(&args, 1, "Pexp_ifthenelse then")?)?,
                otherwise,
            ))
        }
        "Pexp_sequence" => Ok(ExpressionDesc::Sequence(
            expression_box(arg(&args, 0, "Pexp_sequence first")?)?,
            expression_box(arg(&args, 1, "Pexp_sequence second")?)?,
        )),
        "Pexp_while" => Ok(ExpressionDesc::While(
            expression_box(arg(&args, 0, "Pexp_while condition")?)?,
            expression_box(arg(&args, 1, "Pexp_while body")?)?,
        )),
        "Pexp_for" => {
            let direction = {
                let (tag, _) = variant(arg(&args, 3, "Pexp_for direction")?)?;
                if tag == "Downto" {
                    Direction::Downto
                } else {
                    Direction::Upto
                }
            };
            Ok(ExpressionDesc::For(
                Box::new(pattern(arg(&args, 0, "Pexp_for pattern")?)?),
                expression_box(arg(&args, 1, "Pexp_for from")?)?,
                expression_box(arg(&args, 2, "Pexp_for to")?)?,
                direction,
                expression_box(arg(&args, 4, "Pexp_for body")?)?,
            ))
        }
        "Pexp_constraint" => Ok(ExpressionDesc::Constraint(
            expression_box(arg(&args, 0, "Pexp_constraint value")?)?,
            Box::new(core_type(arg(&args, 1, "Pexp_constraint type")?)?),
        )),
        "Pexp_coerce" => {
            let from = match arg(&args, 1, "Pexp_coerce from").ok().and_then(opt) {
                Some(value) => Some(Box::new(core_type(value)?)),
                None => None,
            };
            Ok(ExpressionDesc::Coerce(
                expression_box(arg(&args, 0, "Pexp_coerce value")?)?,
                from,
                Box::new(core_type(arg(&args, 2, "Pexp_coerce type")?)?),
            ))
        }
        "Pexp_send" => Ok(ExpressionDesc::Send(
            expression_box(arg(&args, 0, "Pexp_send receiver")?)?,
            string_loc(arg(&args, 1, "Pexp_send method")?)?,
        )),
        "Pexp_new" => Ok(ExpressionDesc::New(longident_loc(arg(
            &args,
            0,
            "Pexp_new",
        )?)?)),
        "Pexp_setinstvar" => Ok(ExpressionDesc::SetInstVar(
            string_loc(arg(&args, 0, "Pexp_setinstvar name")?)?,
            expression_box(arg(&args, 1, "Pexp_setinstvar value")?)?,
        )),
        "Pexp_override" => {
            let items = elements(arg(&args, 0, "Pexp_override fields")?, "fields")?;
            let mut fields = Vec::new();
            for item in items {
                let (name, value) = pair(item, "override field")?;
                fields.push((string_loc(name)?, expression(value)?));
            }
            Ok(ExpressionDesc::Override(fields))
        }
        "Pexp_letmodule" => Ok(ExpressionDesc::LetModule(
            opt_string_loc(arg(&args, 0, "Pexp_letmodule name")?)?,
            Box::new(module_expr(arg(&args, 1, "Pexp_letmodule module")?)?),
            expression_box(arg(&args, 2, "Pexp_letmodule body")?)?,
        )),
        "Pexp_letexception" => Ok(ExpressionDesc::LetException(
            extension_constructor(arg(&args, 0, "Pexp_letexception constructor")?)?,
            expression_box(arg(&args, 1, "Pexp_letexception body")?)?,
        )),
        "Pexp_assert" => Ok(ExpressionDesc::Assert(expression_box(arg(
            &args,
            0,
            "Pexp_assert",
        )?)?)),
        "Pexp_lazy" => Ok(ExpressionDesc::Lazy(expression_box(arg(
            &args,
            0,
            "Pexp_lazy",
        )?)?)),
        "Pexp_poly" => {
            let typ = match arg(&args, 1, "Pexp_poly type").ok().and_then(opt) {
                Some(value) => Some(Box::new(core_type(value)?)),
                None => None,
            };
            Ok(ExpressionDesc::Poly(
                expression_box(arg(&args, 0, "Pexp_poly value")?)?,
                typ,
            ))
        }
        "Pexp_object" => Ok(ExpressionDesc::Object),
        "Pexp_newtype" => Ok(ExpressionDesc::NewType(
            string_loc(arg(&args, 0, "Pexp_newtype name")?)?,
            expression_box(arg(&args, 1, "Pexp_newtype body")?)?,
        )),
        "Pexp_pack" => Ok(ExpressionDesc::Pack(Box::new(module_expr(arg(
            &args,
            0,
            "Pexp_pack",
        )?)?))),
        "Pexp_open" => Ok(ExpressionDesc::OpenIn(
            open_declaration(arg(&args, 0, "Pexp_open declaration")?)?,
            expression_box(arg(&args, 1, "Pexp_open body")?)?,
        )),
        "Pexp_letop" => {
            let letop = arg(&args, 0, "Pexp_letop")?;
            let items = elements(field(letop, "ands")?, "ands")?;
            let mut ands = Vec::new();
            for item in items {
                ands.push(binding_op(item)?);
            }
            Ok(ExpressionDesc::LetOp(Box::new(LetOp {
                binding: binding_op(field(letop, "let_")?)?,
                ands,
                body: expression_box(field(letop, "body")?)?,
            })))
        }
        "Pexp_extension" => Ok(ExpressionDesc::Extension(extension(arg(
            &args,
            0,
            "Pexp_extension",
        )?)?)),
        "Pexp_unreachable" => Ok(ExpressionDesc::Unreachable),
        _ => Ok(ExpressionDesc::Unknown(tag.to_string())),
    }
}

fn cases(value: &Value) -> Result<Vec<Case>> {
    let items = elements(value, "cases")?;
    let mut result = Vec::new();
    for item in items {
        let guard = match opt(field(item, "pc_guard")?) {
            Some(value) => Some(expression(value)?),
            None => None,
        };
        result.push(Case {
            lhs: pattern(field(item, "pc_lhs")?)?,
            guard,
            rhs: expression(field(item, "pc_rhs")?)?,
        });
    }
    Ok(result)
}

fn function_param(value: &Value) -> Result<FunctionParam> {
    let (tag, args) = variant(field(value, "pparam_desc")?)?;
    match tag {
        "Pparam_val" => {
            let default = match arg(&args, 1, "parameter default").ok().and_then(opt) {
                Some(value) => Some(expression(value)?),
                None => None,
            };
            Ok(FunctionParam::Value {
                label: arg_label(arg(&args, 0, "parameter label")?)?,
                default,
                pattern: pattern(arg(&args, 2, "parameter pattern")?)?,
            })
        }
        "Pparam_newtype" => Ok(FunctionParam::NewType(string_loc(arg(
            &args,
            0,
            "newtype parameter",
        )?)?)),
        _ => Err(ParsingError::UnexpectedShape(format!(
            "function parameter {}",
            tag
        ))),
    }
}

fn function_body(value: &Value) -> Result<FunctionBody> {
    let (tag, args) = variant(value)?;
    match tag {
        "Pfunction_body" => Ok(FunctionBody::Expression(expression_box(arg(
            &args,
            0,
            "function body",
        )?)?)),
        "Pfunction_cases" => Ok(FunctionBody::Cases(cases(arg(
            &args,
            0,
            "function cases",
        )?)?)),
        _ => Err(ParsingError::UnexpectedShape(format!(
            "function body {}",
            tag
        ))),
    }
}

fn binding_op(value: &Value) -> Result<BindingOp> {
    Ok(BindingOp {
        op: string_loc(field(value, "pbop_op")?)?,
        pattern: pattern(field(value, "pbop_pat")?)?,
        expr: expression(field(value, "pbop_exp")?)?,
    })
}

fn extension(value: &Value) -> Result<Extension> {
    let (name, payload_value) = pair(value, "extension")?;
    Ok(Extension {
        name: string_loc(name)?,
        payload: payload(payload_value)?,
    })
}

pub fn pattern(value: &Value) -> Result<Pattern> {
    Ok(Pattern {
        desc: pattern_desc(field(value, "ppat_desc")?)?,
        span: span(field(value, "ppat_loc")?)?,
        attributes: attributes(field(value, "ppat_attributes")?)?,
    })
}

fn pattern_box(value: &Value) -> Result<Box<Pattern>> {
    Ok(Box::new(pattern(value)?))
}

fn pattern_list(value: &Value, what: &'static str) -> Result<Vec<Pattern>> {
    let items = elements(value, what)?;
    let mut result = Vec::new();
    for item in items {
        result.push(pattern(item)?);
    }
    Ok(result)
}

fn pattern_desc(value: &Value) -> Result<PatternDesc> {
    let (tag, args) = variant(value)?;
    match tag {
        "Ppat_any" => Ok(PatternDesc::Any),
        "Ppat_var" => Ok(PatternDesc::Var(string_loc(arg(&args, 0, "Ppat_var")?)?)),
        "Ppat_alias" => Ok(PatternDesc::Alias(
            pattern_box(arg(&args, 0, "Ppat_alias pattern")?)?,
            string_loc(arg(&args, 1, "Ppat_alias name")?)?,
        )),
        "Ppat_constant" => Ok(PatternDesc::Constant(constant(arg(
            &args,
            0,
            "Ppat_constant",
        )?)?)),
        "Ppat_interval" => Ok(PatternDesc::Interval(
            constant(arg(&args, 0, "Ppat_interval low")?)?,
            constant(arg(&args, 1, "Ppat_interval high")?)?,
        )),
        "Ppat_tuple" => Ok(PatternDesc::Tuple(pattern_list(
            arg(&args, 0, "Ppat_tuple elements")?,
            "tuple pattern",
        )?)),
        "Ppat_construct" => {
            let lid = longident_loc(arg(&args, 0, "Ppat_construct name")?)?;
            let argument = match arg(&args, 1, "Ppat_construct argument").ok().and_then(opt) {
                Some(value) => {
                    let (newtypes_value, pattern_value) = pair(value, "constructor argument")?;
                    let items = elements(newtypes_value, "constructor newtypes")?;
                    let mut newtypes = Vec::new();
                    for item in items {
                        newtypes.push(string_loc(item)?);
                    }
                    Some(ConstructPattern {
                        newtypes,
                        pattern: pattern_box(pattern_value)?,
                    })
                }
                None => None,
            };
            Ok(PatternDesc::Construct(lid, argument))
        }
        "Ppat_variant" => {
            let label = string_of(arg(&args, 0, "Ppat_variant label")?, "variant label")?;
            let argument = match arg(&args, 1, "Ppat_variant argument").ok().and_then(opt) {
                Some(value) => Some(pattern_box(value)?),
                None => None,
            };
            Ok(PatternDesc::Variant(label, argument))
        }
        "Ppat_record" => {
            let items = elements(arg(&args, 0, "Ppat_record fields")?, "fields")?;
            let mut fields = Vec::new();
            for item in items {
                let (lid, value) = pair(item, "record pattern field")?;
                fields.push((longident_loc(lid)?, pattern(value)?));
            }
            Ok(PatternDesc::Record(
                fields,
                closed_flag(arg(&args, 1, "Ppat_record flag")?)?,
            ))
        }
        "Ppat_array" => Ok(PatternDesc::Array(pattern_list(
            arg(&args, 0, "Ppat_array elements")?,
            "array pattern",
        )?)),
        "Ppat_or" => Ok(PatternDesc::Or(
            pattern_box(arg(&args, 0, "Ppat_or left")?)?,
            pattern_box(arg(&args, 1, "Ppat_or right")?)?,
        )),
        "Ppat_constraint" => Ok(PatternDesc::Constraint(
            pattern_box(arg(&args, 0, "Ppat_constraint pattern")?)?,
            Box::new(core_type(arg(&args, 1, "Ppat_constraint type")?)?),
        )),
        "Ppat_type" => Ok(PatternDesc::Type(longident_loc(arg(
            &args,
            0,
            "Ppat_type",
        )?)?)),
        "Ppat_lazy" => Ok(PatternDesc::Lazy(pattern_box(arg(&args, 0, "Ppat_lazy")?)?)),
        "Ppat_unpack" => Ok(PatternDesc::Unpack(opt_string_loc(arg(
            &args,
            0,
            "Ppat_unpack",
        )?)?)),
        "Ppat_exception" => Ok(PatternDesc::Exception(pattern_box(arg(
            &args,
            0,
            "Ppat_exception",
        )?)?)),
        "Ppat_effect" => Ok(PatternDesc::Effect(
            pattern_box(arg(&args, 0, "Ppat_effect pattern")?)?,
            pattern_box(arg(&args, 1, "Ppat_effect continuation")?)?,
        )),
        "Ppat_extension" => Ok(PatternDesc::Extension(extension(arg(
            &args,
            0,
            "Ppat_extension",
        )?)?)),
        "Ppat_open" => Ok(PatternDesc::Open(
            longident_loc(arg(&args, 0, "Ppat_open module")?)?,
            pattern_box(arg(&args, 1, "Ppat_open pattern")?)?,
        )),
        _ => Ok(PatternDesc::Unknown(tag.to_string())),
    }
}

pub fn core_type(value: &Value) -> Result<CoreType> {
    Ok(CoreType {
        desc: core_type_desc(field(value, "ptyp_desc")?)?,
        span: span(field(value, "ptyp_loc")?)?,
        attributes: attributes(field(value, "ptyp_attributes")?)?,
    })
}

fn core_type_list(value: &Value, what: &'static str) -> Result<Vec<CoreType>> {
    let items = elements(value, what)?;
    let mut result = Vec::new();
    for item in items {
        result.push(core_type(item)?);
    }
    Ok(result)
}

fn core_type_desc(value: &Value) -> Result<CoreTypeDesc> {
    let (tag, args) = variant(value)?;
    match tag {
        "Ptyp_any" => Ok(CoreTypeDesc::Any),
        "Ptyp_var" => Ok(CoreTypeDesc::Var(string_of(
            arg(&args, 0, "Ptyp_var")?,
            "type variable",
        )?)),
        "Ptyp_arrow" => Ok(CoreTypeDesc::Arrow(
            arg_label(arg(&args, 0, "Ptyp_arrow label")?)?,
            Box::new(core_type(arg(&args, 1, "Ptyp_arrow domain")?)?),
            Box::new(core_type(arg(&args, 2, "Ptyp_arrow codomain")?)?),
        )),
        "Ptyp_tuple" => Ok(CoreTypeDesc::Tuple(core_type_list(
            arg(&args, 0, "Ptyp_tuple elements")?,
            "tuple type",
        )?)),
        "Ptyp_constr" => Ok(CoreTypeDesc::Constr(
            longident_loc(arg(&args, 0, "Ptyp_constr name")?)?,
            core_type_list(arg(&args, 1, "Ptyp_constr arguments")?, "type arguments")?,
        )),
        "Ptyp_alias" => Ok(CoreTypeDesc::Alias(
            Box::new(core_type(arg(&args, 0, "Ptyp_alias type")?)?),
            string_loc(arg(&args, 1, "Ptyp_alias name")?)?,
        )),
        "Ptyp_object" => Ok(CoreTypeDesc::Object),
        "Ptyp_class" => Ok(CoreTypeDesc::Class),
        "Ptyp_variant" => Ok(CoreTypeDesc::Variant),
        "Ptyp_poly" => Ok(CoreTypeDesc::Poly),
        "Ptyp_package" => Ok(CoreTypeDesc::Package),
        "Ptyp_open" => Ok(CoreTypeDesc::Open),
        "Ptyp_extension" => Ok(CoreTypeDesc::Extension),
        _ => Ok(CoreTypeDesc::Unknown(tag.to_string())),
    }
}

fn module_expr(value: &Value) -> Result<ModuleExpr> {
    Ok(ModuleExpr {
        desc: module_expr_desc(field(value, "pmod_desc")?)?,
        span: span(field(value, "pmod_loc")?)?,
        attributes: attributes(field(value, "pmod_attributes")?)?,
    })
}

fn module_expr_desc(value: &Value) -> Result<ModuleExprDesc> {
    let (tag, args) = variant(value)?;
    match tag {
        "Pmod_ident" => Ok(ModuleExprDesc::Ident(longident_loc(arg(
            &args,
            0,
            "Pmod_ident",
        )?)?)),
        "Pmod_structure" => Ok(ModuleExprDesc::Structure(structure(arg(
            &args,
            0,
            "Pmod_structure",
        )?)?)),
        "Pmod_functor" => Ok(ModuleExprDesc::Functor),
        "Pmod_apply" => Ok(ModuleExprDesc::Apply),
        "Pmod_apply_unit" => Ok(ModuleExprDesc::ApplyUnit),
        "Pmod_constraint" => Ok(ModuleExprDesc::Constraint),
        "Pmod_unpack" => Ok(ModuleExprDesc::Unpack),
        "Pmod_extension" => Ok(ModuleExprDesc::Extension),
        _ => Ok(ModuleExprDesc::Unknown(tag.to_string())),
    }
}

fn module_binding(value: &Value) -> Result<ModuleBinding> {
    Ok(ModuleBinding {
        name: opt_string_loc(field(value, "pmb_name")?)?,
        expr: module_expr(field(value, "pmb_expr")?)?,
        attributes: attributes(field(value, "pmb_attributes")?)?,
        span: span(field(value, "pmb_loc")?)?,
    })
}

fn open_declaration(value: &Value) -> Result<OpenDeclaration> {
    let (override_tag, _) = variant(field(value, "popen_override")?)?;
    Ok(OpenDeclaration {
        expr: module_expr(field(value, "popen_expr")?)?,
        override_: override_tag == "Override",
        attributes: attributes(field(value, "popen_attributes")?)?,
    })
}

fn type_declaration(value: &Value) -> Result<TypeDeclaration> {
    let manifest = match opt(field(value, "ptype_manifest")?) {
        Some(manifest) => Some(core_type(manifest)?),
        None => None,
    };
    Ok(TypeDeclaration {
        name: string_loc(field(value, "ptype_name")?)?,
        kind: type_kind(field(value, "ptype_kind")?)?,
        manifest,
        attributes: attributes(field(value, "ptype_attributes")?)?,
        span: span(field(value, "ptype_loc")?)?,
    })
}

fn type_kind(value: &Value) -> Result<TypeKind> {
    let (tag, args) = variant(value)?;
    match tag {
        "Ptype_abstract" => Ok(TypeKind::Abstract),
        "Ptype_variant" => {
            let items = elements(arg(&args, 0, "variant constructors")?, "constructors")?;
            let mut ctors = Vec::new();
            for item in items {
                ctors.push(constructor_declaration(item)?);
            }
            Ok(TypeKind::Variant(ctors))
        }
        "Ptype_record" => {
            let items = elements(arg(&args, 0, "record labels")?, "labels")?;
            let mut labels = Vec::new();
            for item in items {
                labels.push(label_declaration(item)?);
            }
            Ok(TypeKind::Record(labels))
        }
        "Ptype_open" => Ok(TypeKind::Open),
        _ => Err(ParsingError::UnexpectedShape(format!("type kind {}", tag))),
    }
}

fn constructor_declaration(value: &Value) -> Result<ConstructorDeclaration> {
    let result = match opt(field(value, "pcd_res")?) {
        Some(typ) => Some(core_type(typ)?),
        None => None,
    };
    Ok(ConstructorDeclaration {
        name: string_loc(field(value, "pcd_name")?)?,
        args: constructor_arguments(field(value, "pcd_args")?)?,
        result,
        attributes: attributes(field(value, "pcd_attributes")?)?,
        span: span(field(value, "pcd_loc")?)?,
    })
}

fn constructor_arguments(value: &Value) -> Result<ConstructorArguments> {
    let (tag, args) = variant(value)?;
    match tag {
        "Pcstr_tuple" => Ok(ConstructorArguments::Tuple(core_type_list(
            arg(&args, 0, "constructor tuple")?,
            "constructor arguments",
        )?)),
        "Pcstr_record" => {
            let items = elements(arg(&args, 0, "constructor record")?, "labels")?;
            let mut labels = Vec::new();
            for item in items {
                labels.push(label_declaration(item)?);
            }
            Ok(ConstructorArguments::Record(labels))
        }
        _ => Err(ParsingError::UnexpectedShape(format!(
            "constructor arguments {}",
            tag
        ))),
    }
}

fn label_declaration(value: &Value) -> Result<LabelDeclaration> {
    let (mutable_tag, _) = variant(field(value, "pld_mutable")?)?;
    Ok(LabelDeclaration {
        name: string_loc(field(value, "pld_name")?)?,
        mutable_: mutable_tag == "Mutable",
        typ: core_type(field(value, "pld_type")?)?,
        attributes: attributes(field(value, "pld_attributes")?)?,
        span: span(field(value, "pld_loc")?)?,
    })
}

fn extension_constructor(value: &Value) -> Result<ExtensionConstructor> {
    Ok(ExtensionConstructor {
        name: string_loc(field(value, "pext_name")?)?,
        kind: extension_constructor_kind(field(value, "pext_kind")?)?,
        attributes: attributes(field(value, "pext_attributes")?)?,
        span: span(field(value, "pext_loc")?)?,
    })
}

fn extension_constructor_kind(value: &Value) -> Result<ExtensionConstructorKind> {
    let (tag, args) = variant(value)?;
    match tag {
        "Pext_decl" => {
            let items = elements(arg(&args, 0, "existential variables")?, "existentials")?;
            let mut existentials = Vec::new();
            for item in items {
                existentials.push(string_loc(item)?);
            }
            let result = match arg(&args, 2, "constructor result").ok().and_then(opt) {
                Some(typ) => Some(core_type(typ)?),
                None => None,
            };
            Ok(ExtensionConstructorKind::Decl(
                existentials,
                constructor_arguments(arg(&args, 1, "constructor arguments")?)?,
                result,
            ))
        }
        "Pext_rebind" => Ok(ExtensionConstructorKind::Rebind(longident_loc(arg(
            &args,
            0,
            "Pext_rebind",
        )?)?)),
        _ => Err(ParsingError::UnexpectedShape(format!(
            "extension constructor {}",
            tag
        ))),
    }
}

fn type_exception(value: &Value) -> Result<TypeException> {
    Ok(TypeException {
        constructor: extension_constructor(field(value, "ptyexn_constructor")?)?,
        attributes: attributes(field(value, "ptyexn_attributes")?)?,
    })
}

fn value_description(value: &Value) -> Result<ValueDescription> {
    let items = elements(field(value, "pval_prim")?, "primitives")?;
    let mut prims = Vec::new();
    for item in items {
        prims.push(string_of(item, "primitive")?);
    }
    Ok(ValueDescription {
        name: string_loc(field(value, "pval_name")?)?,
        typ: core_type(field(value, "pval_type")?)?,
        prims,
        attributes: attributes(field(value, "pval_attributes")?)?,
        span: span(field(value, "pval_loc")?)?,
    })
}

fn directive(value: &Value) -> Result<Directive> {
    let argument = match opt(field(value, "pdir_arg")?) {
        Some(argument) => Some(DirectiveArgument {
            desc: directive_argument_desc(field(argument, "pdira_desc")?)?,
            span: span(field(argument, "pdira_loc")?)?,
        }),
        None => None,
    };
    Ok(Directive {
        name: string_loc(field(value, "pdir_name")?)?,
        arg: argument,
        span: span(field(value, "pdir_loc")?)?,
    })
}

fn directive_argument_desc(value: &Value) -> Result<DirectiveArgumentDesc> {
    let (tag, args) = variant(value)?;
    match tag {
        "Pdir_string" => Ok(DirectiveArgumentDesc::String(string_of(
            arg(&args, 0, "Pdir_string")?,
            "directive string",
        )?)),
        "Pdir_int" => Ok(DirectiveArgumentDesc::Int(
            string_of(arg(&args, 0, "Pdir_int")?, "directive integer")?,
            args.get(1).and_then(|v| suffix_of(v)),
        )),
        "Pdir_ident" => Ok(DirectiveArgumentDesc::Ident(longident(arg(
            &args,
            0,
            "Pdir_ident",
        )?)?)),
        "Pdir_bool" => Ok(DirectiveArgumentDesc::Bool(
            arg(&args, 0, "Pdir_bool")?.as_bool().unwrap_or(false),
        )),
        _ => Ok(DirectiveArgumentDesc::Unknown(tag.to_string())),
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use serde_json::json;

    fn loc(start: u64, end: u64) -> Value {
        json!({
            "loc_start": { "pos_cnum": start },
            "loc_end": { "pos_cnum": end },
            "loc_ghost": false
        })
    }

    #[test]
    fn decodes_a_let_binding() {
        let tree = json!([
            ["Ptop_def", [
                {
                    "pstr_desc": ["Pstr_value", ["Nonrecursive"], [
                        {
                            "pvb_pat": {
                                "ppat_desc": ["Ppat_var", { "txt": "a", "loc": loc(4, 5) }],
                                "ppat_loc": loc(4, 5),
                                "ppat_attributes": []
                            },
                            "pvb_expr": {
                                "pexp_desc": ["Pexp_constant", {
                                    "pconst_desc": ["Pconst_integer", "1", null],
                                    "pconst_loc": loc(8, 9)
                                }],
                                "pexp_loc": loc(8, 9),
                                "pexp_attributes": []
                            },
                            "pvb_attributes": [],
                            "pvb_loc": loc(0, 9)
                        }
                    ]],
                    "pstr_loc": loc(0, 9)
                }
            ]]
        ]);
        let program = program(&tree).unwrap();
        assert_eq!(program.phrases.len(), 1);
        let Phrase::Definitions(items) = &program.phrases[0] else {
            panic!("expected definitions");
        };
        let StructureItemDesc::Value(flag, bindings) = &items[0].desc else {
            panic!("expected a value group");
        };
        assert_eq!(*flag, RecFlag::Nonrecursive);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].pattern.desc, PatternDesc::Var("a".to_string()));
        assert_eq!(
            bindings[0].expr.desc,
            ExpressionDesc::Constant(Constant::Integer("1".to_string(), None))
        );
        assert_eq!(bindings[0].span, Span::new(0, 9));
    }

    #[test]
    fn decodes_a_directive() {
        let tree = json!([
            ["Ptop_dir", {
                "pdir_name": { "txt": "require", "loc": loc(1, 8) },
                "pdir_arg": {
                    "pdira_desc": ["Pdir_string", "stdlib"],
                    "pdira_loc": loc(9, 17)
                },
                "pdir_loc": loc(0, 17)
            }]
        ]);
        let program = program(&tree).unwrap();
        let Phrase::Directive(directive) = &program.phrases[0] else {
            panic!("expected a directive");
        };
        assert_eq!(directive.name, "require");
        assert_eq!(
            directive.arg.as_ref().unwrap().desc,
            DirectiveArgumentDesc::String("stdlib".to_string())
        );
    }

    #[test]
    fn unknown_expression_tags_become_unknown_nodes() {
        let tree = json!({
            "pexp_desc": ["Pexp_hole"],
            "pexp_loc": loc(0, 1),
            "pexp_attributes": []
        });
        let expr = expression(&tree).unwrap();
        assert_eq!(expr.desc, ExpressionDesc::Unknown("Pexp_hole".to_string()));
    }

    #[test]
    fn missing_fields_are_failures() {
        let tree = json!({ "pexp_desc": ["Pexp_unreachable"] });
        assert!(matches!(
            expression(&tree),
            Err(ParsingError::MissingField(_))
        ));
    }

    #[test]
    fn decodes_qualified_identifiers() {
        let lid = json!(["Ldot", ["Lident", "Z"], "of_nativeint"]);
        assert_eq!(longident(&lid).unwrap(), Longident::dot("Z", "of_nativeint"));
    }

    #[test]
    fn decodes_marker_attributes() {
        let attr = json!({
            "attr_name": { "txt": "imandra_theorem", "loc": loc(0, 0) },
            "attr_payload": ["PStr", []],
            "attr_loc": loc(0, 0)
        });
        let attr = attribute(&attr).unwrap();
        assert_eq!(attr.name, "imandra_theorem");
        assert_eq!(attr.payload, Payload::Structure(vec![]));
    }
}
