#[cfg(test)]
mod verify {
    use imlformat::formatting::{format, Options};
    use imlformat::parsing::{parse_json, ParsingError};
    use serde_json::json;

    fn loc(start: usize, end: usize) -> serde_json::Value {
        json!({
            "loc_start": { "pos_cnum": start },
            "loc_end": { "pos_cnum": end },
            "loc_ghost": false
        })
    }

    fn constant_expr(repr: &str, start: usize, end: usize) -> serde_json::Value {
        json!({
            "pexp_desc": ["Pexp_constant", {
                "pconst_desc": ["Pconst_integer", repr, null],
                "pconst_loc": loc(start, end)
            }],
            "pexp_loc": loc(start, end),
            "pexp_attributes": []
        })
    }

    fn let_binding(name: &str, value: serde_json::Value, span: (usize, usize)) -> serde_json::Value {
        json!({
            "pstr_desc": ["Pstr_value", ["Nonrecursive"], [
                {
                    "pvb_pat": {
                        "ppat_desc": ["Ppat_var", { "txt": name, "loc": loc(span.0 + 4, span.0 + 5) }],
                        "ppat_loc": loc(span.0 + 4, span.0 + 5),
                        "ppat_attributes": []
                    },
                    "pvb_expr": value,
                    "pvb_attributes": [],
                    "pvb_loc": loc(span.0, span.1)
                }
            ]],
            "pstr_loc": loc(span.0, span.1)
        })
    }

    #[test]
    fn parses_and_formats_a_binding() {
        let source = "let  a =  1";
        let tree = json!([
            ["Ptop_def", [let_binding("a", constant_expr("1", 10, 11), (0, 11))]]
        ]);
        let program = parse_json(&tree.to_string()).unwrap();
        let result = format(&program, source, &Options::default()).unwrap();
        assert_eq!(result, "let a = 1\n");
    }

    #[test]
    fn parses_and_formats_a_directive() {
        let tree = json!([
            ["Ptop_dir", {
                "pdir_name": { "txt": "somedirective", "loc": loc(1, 14) },
                "pdir_arg": {
                    "pdira_desc": ["Pdir_string", "def"],
                    "pdira_loc": loc(15, 20)
                },
                "pdir_loc": loc(0, 22)
            }]
        ]);
        let program = parse_json(&tree.to_string()).unwrap();
        let result = format(&program, "#somedirective \"def\";;", &Options::default()).unwrap();
        assert_eq!(result, "#somedirective \"def\";;\n");
    }

    #[test]
    fn unknown_items_keep_their_phrase_verbatim() {
        let source = "module type S = sig end";
        let tree = json!([
            ["Ptop_def", [
                {
                    "pstr_desc": ["Pstr_modtype", {}],
                    "pstr_loc": loc(0, source.len())
                }
            ]]
        ]);
        let program = parse_json(&tree.to_string()).unwrap();
        let result = format(&program, source, &Options::default()).unwrap();
        assert_eq!(result, "module type S = sig end\n");
    }

    #[test]
    fn theorem_marker_selects_the_declaration_keyword() {
        let source = "lemma l1 x = x";
        let ident = |name: &str, start: usize, end: usize| {
            json!({
                "pexp_desc": ["Pexp_ident", { "txt": ["Lident", name], "loc": loc(start, end) }],
                "pexp_loc": loc(start, end),
                "pexp_attributes": []
            })
        };
        let tree = json!([
            ["Ptop_def", [
                {
                    "pstr_desc": ["Pstr_value", ["Nonrecursive"], [
                        {
                            "pvb_pat": {
                                "ppat_desc": ["Ppat_var", { "txt": "l1", "loc": loc(6, 8) }],
                                "ppat_loc": loc(6, 8),
                                "ppat_attributes": []
                            },
                            "pvb_expr": {
                                "pexp_desc": ["Pexp_function",
                                    [
                                        {
                                            "pparam_desc": ["Pparam_val", ["Nolabel"], null, {
                                                "ppat_desc": ["Ppat_var", { "txt": "x", "loc": loc(9, 10) }],
                                                "ppat_loc": loc(9, 10),
                                                "ppat_attributes": []
                                            }],
                                            "pparam_loc": loc(9, 10)
                                        }
                                    ],
                                    null,
                                    ["Pfunction_body", ident("x", 13, 14)]
                                ],
                                "pexp_loc": loc(9, 14),
                                "pexp_attributes": []
                            },
                            "pvb_attributes": [
                                {
                                    "attr_name": { "txt": "imandra_theorem", "loc": loc(0, 0) },
                                    "attr_payload": ["PStr", []],
                                    "attr_loc": loc(0, 0)
                                }
                            ],
                            "pvb_loc": loc(6, 14)
                        }
                    ]],
                    "pstr_loc": loc(0, 14)
                }
            ]]
        ]);
        let program = parse_json(&tree.to_string()).unwrap();
        let result = format(&program, source, &Options::default()).unwrap();
        // The marker is consumed, not rendered as an attribute.
        assert_eq!(result, "lemma l1 x = x\n");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            parse_json("not json"),
            Err(ParsingError::InvalidJson(_))
        ));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let tree = json!([
            ["Ptop_def", [
                { "pstr_desc": ["Pstr_eval"] }
            ]]
        ]);
        assert!(matches!(
            parse_json(&tree.to_string()),
            Err(ParsingError::MissingField(_))
        ));
    }
}
