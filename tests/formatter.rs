#[cfg(test)]
mod verify {
    use imlformat::formatting::{format, Options, Semicolons};
    use imlformat::language::*;

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

    fn apply(callee: &str, argument: Expression) -> Expression {
        expr(ExpressionDesc::Apply(
            Box::new(var(callee)),
            vec![(ArgLabel::None, argument)],
        ))
    }

    fn pat(desc: PatternDesc) -> Pattern {
        Pattern {
            desc,
            span: Span::default(),
            attributes: vec![],
        }
    }

    fn item(desc: StructureItemDesc) -> StructureItem {
        StructureItem {
            desc,
            span: Span::default(),
        }
    }

    fn binding(name: &str, value: Expression) -> ValueBinding {
        ValueBinding {
            pattern: pat(PatternDesc::Var(name.to_string())),
            expr: value,
            attributes: vec![],
            span: Span::default(),
        }
    }

    fn marker(name: &str) -> Attribute {
        Attribute {
            name: name.to_string(),
            payload: Payload::Structure(vec![]),
            span: Span::default(),
        }
    }

    fn comment(body: &str) -> Attribute {
        Attribute {
            name: "ocaml.comment".to_string(),
            payload: Payload::Structure(vec![item(StructureItemDesc::Eval(
                expr(ExpressionDesc::Constant(Constant::String(
                    body.to_string(),
                    None,
                ))),
                vec![],
            ))]),
            span: Span::default(),
        }
    }

    fn attribute(name: &str, payload: Expression) -> Attribute {
        Attribute {
            name: name.to_string(),
            payload: Payload::Structure(vec![item(StructureItemDesc::Eval(payload, vec![]))]),
            span: Span::default(),
        }
    }

    fn definitions(items: Vec<StructureItem>) -> Program {
        Program {
            phrases: vec![Phrase::Definitions(items)],
        }
    }

    fn param(name: &str) -> FunctionParam {
        FunctionParam::Value {
            label: ArgLabel::None,
            default: None,
            pattern: pat(PatternDesc::Var(name.to_string())),
        }
    }

    fn constr(name: &str) -> CoreType {
        CoreType {
            desc: CoreTypeDesc::Constr(Longident::ident(name), vec![]),
            span: Span::default(),
            attributes: vec![],
        }
    }

    #[test]
    fn simple_binding() {
        let program = definitions(vec![item(StructureItemDesc::Value(
            RecFlag::Nonrecursive,
            vec![binding("a", int("1"))],
        ))]);
        let result = format(&program, "let a = 1", &Options::default()).unwrap();
        assert_eq!(result, "let a = 1\n");
    }

    #[test]
    fn semicolons_terminate_definitions_when_required() {
        let program = definitions(vec![item(StructureItemDesc::Value(
            RecFlag::Nonrecursive,
            vec![binding("a", int("1"))],
        ))]);
        let options = Options {
            semicolons: Semicolons::Required,
            ..Options::default()
        };
        let result = format(&program, "let a = 1", &options).unwrap();
        assert_eq!(result, "let a = 1;;\n");
    }

    #[test]
    fn blank_line_between_phrases() {
        let phrase = |name: &str| {
            Phrase::Definitions(vec![item(StructureItemDesc::Value(
                RecFlag::Nonrecursive,
                vec![binding(name, int("1"))],
            ))])
        };
        let program = Program {
            phrases: vec![phrase("a"), phrase("b")],
        };
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "let a = 1\n\nlet b = 1\n");
    }

    #[test]
    fn theorem_with_hoisted_parameters() {
        let source = "theorem thm1 x y = f x > x && f y > y [@@imandra_theorem] [@@timeout 3600]";
        let body = infix(
            "&&",
            infix(">", apply("f", var("x")), var("x")),
            infix(">", apply("f", var("y")), var("y")),
        );
        let function = expr(ExpressionDesc::Function(
            vec![param("x"), param("y")],
            FunctionBody::Expression(Box::new(body)),
        ));
        let program = definitions(vec![item(StructureItemDesc::Value(
            RecFlag::Nonrecursive,
            vec![ValueBinding {
                pattern: pat(PatternDesc::Var("thm1".to_string())),
                expr: function,
                attributes: vec![marker("imandra_theorem"), attribute("timeout", int("3600"))],
                span: Span::new(8, source.len()),
            }],
        ))]);
        let result = format(&program, source, &Options::default()).unwrap();
        assert_eq!(
            result,
            "theorem thm1 x y = f x > x && f y > y\n[@@timeout 3600]\n"
        );
    }

    #[test]
    fn lemma_keyword_recovered_from_source() {
        let source = "lemma l1 x = x";
        let function = expr(ExpressionDesc::Function(
            vec![param("x")],
            FunctionBody::Expression(Box::new(var("x"))),
        ));
        let program = definitions(vec![item(StructureItemDesc::Value(
            RecFlag::Nonrecursive,
            vec![ValueBinding {
                pattern: pat(PatternDesc::Var("l1".to_string())),
                expr: function,
                attributes: vec![marker("imandra_theorem")],
                span: Span::new(6, source.len()),
            }],
        ))]);
        let result = format(&program, source, &Options::default()).unwrap();
        assert_eq!(result, "lemma l1 x = x\n");
    }

    #[test]
    fn instance_of_a_function() {
        let function = expr(ExpressionDesc::Function(
            vec![param("x")],
            FunctionBody::Expression(Box::new(infix(">", var("x"), int("0")))),
        ));
        let program = definitions(vec![item(StructureItemDesc::Value(
            RecFlag::Nonrecursive,
            vec![ValueBinding {
                pattern: pat(PatternDesc::Var("i".to_string())),
                expr: function,
                attributes: vec![marker("imandra_instance")],
                span: Span::default(),
            }],
        ))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "instance (fun x -> x > 0)\n");
    }

    #[test]
    fn instance_of_a_plain_value() {
        let program = definitions(vec![item(StructureItemDesc::Value(
            RecFlag::Nonrecursive,
            vec![ValueBinding {
                pattern: pat(PatternDesc::Var("i".to_string())),
                expr: var("c"),
                attributes: vec![marker("imandra_instance")],
                span: Span::default(),
            }],
        ))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "instance (c)\n");
    }

    #[test]
    fn eval_phrase() {
        let program = definitions(vec![item(StructureItemDesc::Eval(
            apply("f", int("0")),
            vec![marker("imandra_eval")],
        ))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "eval f 0\n");
    }

    #[test]
    fn variant_type_declaration() {
        let ctor = |name: &str| ConstructorDeclaration {
            name: name.to_string(),
            args: ConstructorArguments::Tuple(vec![]),
            result: None,
            attributes: vec![],
            span: Span::default(),
        };
        let program = definitions(vec![item(StructureItemDesc::Type(
            RecFlag::Recursive,
            vec![TypeDeclaration {
                name: "u".to_string(),
                kind: TypeKind::Variant(vec![ctor("A"), ctor("B")]),
                manifest: None,
                attributes: vec![],
                span: Span::default(),
            }],
        ))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "type u = A | B\n");
    }

    #[test]
    fn record_type_declaration() {
        let field = |name: &str, typ: CoreType| LabelDeclaration {
            name: name.to_string(),
            mutable_: false,
            typ,
            attributes: vec![],
            span: Span::default(),
        };
        let option_bool = CoreType {
            desc: CoreTypeDesc::Constr(Longident::ident("option"), vec![constr("bool")]),
            span: Span::default(),
            attributes: vec![],
        };
        let int_t = CoreType {
            desc: CoreTypeDesc::Constr(Longident::dot("Int", "t"), vec![]),
            span: Span::default(),
            attributes: vec![],
        };
        let program = definitions(vec![item(StructureItemDesc::Type(
            RecFlag::Recursive,
            vec![TypeDeclaration {
                name: "foo".to_string(),
                kind: TypeKind::Record(vec![
                    field("x", int_t),
                    field("y", option_bool),
                ]),
                manifest: None,
                attributes: vec![],
                span: Span::default(),
            }],
        ))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "type foo = { x : Int.t; y : bool option; }\n");
    }

    #[test]
    fn comment_prints_above_its_declaration() {
        let program = definitions(vec![item(StructureItemDesc::Value(
            RecFlag::Nonrecursive,
            vec![ValueBinding {
                pattern: pat(PatternDesc::Var("a".to_string())),
                expr: int("1"),
                attributes: vec![comment("This is a comment")],
                span: Span::default(),
            }],
        ))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "(* This is a comment *)\nlet a = 1\n");
    }

    #[test]
    fn toplevel_directive() {
        let program = Program {
            phrases: vec![Phrase::Directive(Directive {
                name: "somedirective".to_string(),
                arg: Some(DirectiveArgument {
                    desc: DirectiveArgumentDesc::String("def".to_string()),
                    span: Span::default(),
                }),
                span: Span::default(),
            })],
        };
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "#somedirective \"def\";;\n");
    }

    #[test]
    fn import_attribute() {
        let pair = expr(ExpressionDesc::Tuple(vec![
            var("Mod"),
            expr(ExpressionDesc::Constant(Constant::String(
                "file".to_string(),
                None,
            ))),
        ]));
        let program = definitions(vec![item(StructureItemDesc::Attribute(attribute(
            "import", pair,
        )))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "[@@@import Mod, \"file\"]\n");
    }

    #[test]
    fn open_declaration() {
        let program = definitions(vec![item(StructureItemDesc::Open(OpenDeclaration {
            expr: ModuleExpr {
                desc: ModuleExprDesc::Ident(Longident::ident("Int")),
                span: Span::default(),
                attributes: vec![],
            },
            override_: false,
            attributes: vec![],
        }))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert_eq!(result, "open Int\n");
    }

    #[test]
    fn unprintable_phrase_falls_back_to_verbatim_source() {
        let source = "weird 123\n\nlet b = 2";
        let program = Program {
            phrases: vec![
                Phrase::Definitions(vec![StructureItem {
                    desc: StructureItemDesc::Unknown("Pstr_weird".to_string()),
                    span: Span::new(0, 9),
                }]),
                Phrase::Definitions(vec![item(StructureItemDesc::Value(
                    RecFlag::Nonrecursive,
                    vec![binding("b", int("2"))],
                ))]),
            ],
        };
        let result = format(&program, source, &Options::default()).unwrap();
        assert_eq!(result, "weird 123\n\nlet b = 2\n");
    }

    #[test]
    fn long_conjunction_breaks_at_the_configured_width() {
        let clause = |name: &str| {
            infix(
                ">",
                apply("check_everything", var(name)),
                apply("lower_bound_for", var(name)),
            )
        };
        let body = infix("&&", clause("alpha"), infix("&&", clause("beta"), clause("gamma")));
        let program = definitions(vec![item(StructureItemDesc::Eval(body, vec![]))]);
        let result = format(&program, "", &Options::default()).unwrap();
        assert!(result
            .lines()
            .all(|line| line.len() <= 80), "lines overflow: {}", result);
        assert!(result.contains('\n'));
    }
}
