use super::SyntaxErrorKind;
use crate::ast::{Expr, FuncDecl, VarDecl};
use crate::token::Pos;
use crate::{parse, Error, LexErrorKind};

fn parse_program(source: &str) -> Vec<Expr> {
    match parse(source) {
        Ok(Expr::Program(body)) => body,
        Ok(other) => panic!("expected a program, got {other:?}"),
        Err(err) => panic!("failed to parse {source:?}: {err}"),
    }
}

fn parse_one(source: &str) -> Expr {
    let mut body = parse_program(source);
    assert_eq!(body.len(), 1, "expected one expression in {source:?}");
    body.pop().unwrap()
}

fn syntax_error(source: &str) -> SyntaxErrorKind {
    match parse(source) {
        Err(Error::Syntax(err)) => err.kind,
        other => panic!("expected a syntax error for {source:?}, got {other:?}"),
    }
}

fn name(text: &str) -> Expr {
    Expr::Name(text.to_owned())
}

fn int(n: i64) -> Expr {
    Expr::Integer(n)
}

fn binary(op: &str, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op: op.to_owned(),
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn assign(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Assign {
        op: "=".to_owned(),
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[test]
fn multiplication_binds_tighter_on_the_right() {
    assert_eq!(
        parse_one("1 + 2 * 3"),
        binary("+", int(1), binary("*", int(2), int(3)))
    );
}

#[test]
fn multiplication_binds_tighter_on_the_left() {
    assert_eq!(
        parse_one("1 * 2 + 3"),
        binary("+", binary("*", int(1), int(2)), int(3))
    );
}

#[test]
fn comparison_binds_looser_than_arithmetic() {
    assert_eq!(
        parse_one("a + 1 < b * 2"),
        binary("<", binary("+", name("a"), int(1)), binary("*", name("b"), int(2)))
    );
}

#[test]
fn assignment_nests_to_the_right() {
    assert_eq!(
        parse_one("a = b = 1"),
        assign(name("a"), assign(name("b"), int(1)))
    );
}

#[test]
fn assignment_is_its_own_node() {
    match parse_one("x = 1") {
        Expr::Assign { op, .. } => assert_eq!(op, "="),
        other => panic!("expected an assignment, got {other:?}"),
    }

    // `==` stays an ordinary binary node.
    assert!(matches!(parse_one("a == b"), Expr::Binary { .. }));
}

#[test]
fn parentheses_group() {
    assert_eq!(
        parse_one("(1 + 2) * 3"),
        binary("*", binary("+", int(1), int(2)), int(3))
    );
}

#[test]
fn calls() {
    assert_eq!(
        parse_one("f(1, 2)"),
        Expr::Call {
            callee: Box::new(name("f")),
            args: vec![int(1), int(2)],
        }
    );

    assert_eq!(
        parse_one("f()"),
        Expr::Call {
            callee: Box::new(name("f")),
            args: vec![],
        }
    );

    // Trailing separator before the closing parenthesis is tolerated.
    assert_eq!(
        parse_one("f(1,)"),
        Expr::Call {
            callee: Box::new(name("f")),
            args: vec![int(1)],
        }
    );
}

#[test]
fn call_arguments_may_span_lines() {
    assert_eq!(
        parse_one("f(\n1,\n2)"),
        Expr::Call {
            callee: Box::new(name("f")),
            args: vec![int(1), int(2)],
        }
    );
}

#[test]
fn calls_wrap_once_per_grammar_site() {
    // The atom site and the expression site each apply one argument list.
    assert_eq!(
        parse_one("f(1)(2)"),
        Expr::Call {
            callee: Box::new(Expr::Call {
                callee: Box::new(name("f")),
                args: vec![int(1)],
            }),
            args: vec![int(2)],
        }
    );

    // A third list has no site left to consume it.
    assert!(matches!(
        syntax_error("f(1)(2)(3)"),
        SyntaxErrorKind::Expected { .. }
    ));
}

#[test]
fn function_declaration() {
    assert_eq!(
        parse_one("define f(x as int) as int begin x end"),
        Expr::Function(FuncDecl {
            name: "f".to_owned(),
            params: vec![VarDecl {
                name: "x".to_owned(),
                type_name: "int".to_owned(),
                init: None,
            }],
            body: Box::new(Expr::Program(vec![name("x")])),
            ret_type: "int".to_owned(),
        })
    );
}

#[test]
fn function_body_must_be_a_block() {
    assert_eq!(
        syntax_error("define f() as int 5"),
        SyntaxErrorKind::FunctionBodyNotABlock
    );
}

#[test]
fn parameter_initializers_are_not_rejected() {
    let func = parse_one("define f(x as int = 1) as int begin x end");
    match func {
        Expr::Function(FuncDecl { params, .. }) => {
            assert_eq!(params.len(), 1);
            assert_eq!(params[0].init, Some(Box::new(int(1))));
        }
        other => panic!("expected a function, got {other:?}"),
    }
}

#[test]
fn variable_declarations() {
    assert_eq!(
        parse_one("let x as int = 5"),
        Expr::Var(VarDecl {
            name: "x".to_owned(),
            type_name: "int".to_owned(),
            init: Some(Box::new(int(5))),
        })
    );

    assert_eq!(
        parse_one("let x as int"),
        Expr::Var(VarDecl {
            name: "x".to_owned(),
            type_name: "int".to_owned(),
            init: None,
        })
    );
}

#[test]
fn if_with_and_without_else() {
    assert_eq!(
        parse_one("if x then y end else do z end"),
        Expr::If {
            cond: Box::new(name("x")),
            then: Box::new(Expr::Program(vec![name("y")])),
            else_: Some(Box::new(Expr::Program(vec![name("z")]))),
        }
    );

    assert_eq!(
        parse_one("if x then y end"),
        Expr::If {
            cond: Box::new(name("x")),
            then: Box::new(Expr::Program(vec![name("y")])),
            else_: None,
        }
    );
}

#[test]
fn block_newline_variants() {
    let expected = Expr::Program(vec![name("x")]);
    assert_eq!(parse_one("begin x end"), expected);
    assert_eq!(parse_one("begin x\nend"), expected);
    assert_eq!(parse_one("begin\nx\nend"), expected);
    assert_eq!(parse_one("begin x\n\nend"), expected);

    assert_eq!(parse_one("begin end"), Expr::Program(vec![]));
}

#[test]
fn statements_need_newline_separators() {
    assert_eq!(parse_program("1\n2\n"), vec![int(1), int(2)]);
    assert_eq!(parse_program("1\n2"), vec![int(1), int(2)]);

    assert_eq!(
        syntax_error("1 2"),
        SyntaxErrorKind::Expected {
            expected: "`\\n`".to_owned(),
            found: "integer `2`".to_owned(),
        }
    );

    assert!(matches!(
        syntax_error("begin x y end"),
        SyntaxErrorKind::Expected { .. }
    ));
}

#[test]
fn blank_lines_are_skipped() {
    assert_eq!(parse_program(""), vec![]);
    assert_eq!(parse_program("\n\n"), vec![]);
    assert_eq!(parse_program("\n\n1\n\n"), vec![int(1)]);
}

#[test]
fn missing_end_is_fatal() {
    assert_eq!(
        syntax_error("begin x"),
        SyntaxErrorKind::Expected {
            expected: "keyword `end`".to_owned(),
            found: "end of input".to_owned(),
        }
    );

    assert!(matches!(
        syntax_error("begin"),
        SyntaxErrorKind::Expected { .. }
    ));
}

#[test]
fn lexical_errors_propagate_with_their_position() {
    match parse("1 + @") {
        Err(Error::Lex(err)) => {
            assert_eq!(err.kind, LexErrorKind::UnexpectedChar('@'));
            assert_eq!(err.pos, Pos::new(0, 4));
        }
        other => panic!("expected a lexical error, got {other:?}"),
    }
}

#[test]
fn syntax_errors_carry_the_offending_position() {
    match parse("1 2") {
        Err(Error::Syntax(err)) => assert_eq!(err.pos, Pos::new(0, 2)),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn operators_without_precedence_are_rejected() {
    assert_eq!(
        syntax_error("a ? b"),
        SyntaxErrorKind::NotBinaryOperator("?".to_owned())
    );
}

#[test]
fn out_of_range_integers_are_rejected() {
    assert_eq!(
        syntax_error("99999999999999999999"),
        SyntaxErrorKind::NumberOutOfRange("99999999999999999999".to_owned())
    );
}

#[test]
fn literal_atoms() {
    assert_eq!(parse_one("\"hi\""), Expr::String("hi".to_owned()));
    assert_eq!(parse_one("'a'"), Expr::Char(b'a'));
    assert_eq!(parse_one("''"), Expr::Char(0));
    assert_eq!(parse_one("true"), Expr::Bool(true));
    assert_eq!(parse_one("false"), Expr::Bool(false));
    assert_eq!(parse_one("1.5"), Expr::Float(1.5));
}

#[test]
fn keywords_are_not_expressions() {
    assert_eq!(
        syntax_error("as"),
        SyntaxErrorKind::Expected {
            expected: "an expression".to_owned(),
            found: "keyword `as`".to_owned(),
        }
    );
}

#[test]
fn whole_program() {
    let source = "\
define max(a as int, b as int) as int begin
    if a > b then a end else do b end
end

let m as int = max(1, 2)
m
";

    let body = parse_program(source);
    assert_eq!(body.len(), 3);

    assert!(matches!(&body[0], Expr::Function(FuncDecl { name, .. }) if name == "max"));
    assert!(matches!(&body[1], Expr::Var(VarDecl { init: Some(_), .. })));
    assert_eq!(body[2], name("m"));
}
