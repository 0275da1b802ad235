use sof::{
    ast::PrimitiveToken,
    interpreter::{
        lexer::{LexicalError, TokenKind, Tokenizer},
        parser::parse,
        preprocessor::preprocess,
        source::SourceFile,
    },
};

fn kinds(code: &str) -> Vec<TokenKind> {
    let mut tokenizer = Tokenizer::new(code);
    let mut kinds = Vec::new();
    while let Some(token) = tokenizer.next().expect("token stream should be clean") {
        kinds.push(token.kind);
    }
    kinds
}

#[test]
fn preprocessing_is_idempotent() {
    let inputs = ["1 2 + writeln",
                  "1 # comment\n2",
                  "#* block *# 3",
                  "\"a # b\" writeln",
                  "1 \\\n2",
                  "\"quoted \\\" hash # inside\" 4 # trailing"];
    for input in inputs {
        let once = preprocess("<literal>", input).unwrap();
        let twice = preprocess("<literal>", &once).unwrap();
        assert_eq!(once, twice, "not idempotent for: {input}");
    }
}

#[test]
fn preprocessing_preserves_line_counts() {
    let raw = "a #* one\ntwo\nthree *# b\nc";
    let cleaned = preprocess("<literal>", raw).unwrap();
    assert_eq!(raw.matches('\n').count(), cleaned.matches('\n').count());
}

#[test]
fn preprocessing_errors_cite_the_opening_offset() {
    let error = preprocess("<literal>", "12 \"abc").unwrap_err();
    assert_eq!(error.index(), 3);

    let error = preprocess("<literal>", "1234 #* never closed").unwrap_err();
    assert_eq!(error.index(), 5);
    assert_eq!(error.line(), 1);
}

#[test]
fn tokens_are_classified() {
    assert_eq!(kinds("1 2 +"),
               vec![TokenKind::Integer(1),
                    TokenKind::Integer(2),
                    TokenKind::Primitive(PrimitiveToken::Add)]);
    assert_eq!(kinds("true x 1.5"),
               vec![TokenKind::Boolean(true),
                    TokenKind::Identifier("x".to_string()),
                    TokenKind::Float(1.5)]);
    assert_eq!(kinds("return:3"),
               vec![TokenKind::Primitive(PrimitiveToken::ReturnN(3))]);
    assert_eq!(kinds("{ }"), vec![TokenKind::BlockStart, TokenKind::BlockEnd]);
    assert_eq!(kinds("convert:int"),
               vec![TokenKind::Primitive(PrimitiveToken::ConvertInt)]);
    assert_eq!(kinds(":="), vec![TokenKind::Primitive(PrimitiveToken::FieldSet)]);
}

#[test]
fn string_escapes_are_processed() {
    let mut tokenizer = Tokenizer::new(r#""a\"b\n""#);
    let token = tokenizer.next().unwrap().unwrap();
    match token.kind {
        TokenKind::String(s) => assert_eq!(&*s, "a\"b\n"),
        other => panic!("expected a string token, found {other:?}"),
    }
}

#[test]
fn has_next_is_pure() {
    let tokenizer = Tokenizer::new("  1  ");
    assert!(tokenizer.has_next());
    assert!(tokenizer.has_next());

    let empty = Tokenizer::new("   ");
    assert!(!empty.has_next());
}

#[test]
fn save_and_restore_replays_the_token_stream() {
    let mut tokenizer = Tokenizer::new("1 2 3 4");
    tokenizer.next().unwrap();

    tokenizer.push_state();
    let replay_first = tokenizer.next().unwrap().unwrap();
    let replay_second = tokenizer.next().unwrap().unwrap();
    assert!(tokenizer.pop_state());

    assert_eq!(tokenizer.next().unwrap().unwrap(), replay_first);
    assert_eq!(tokenizer.next().unwrap().unwrap(), replay_second);
    assert!(!tokenizer.pop_state());
}

#[test]
fn appending_code_preserves_the_position() {
    let mut tokenizer = Tokenizer::new("1 2");
    while tokenizer.next().unwrap().is_some() {}
    assert!(!tokenizer.has_next());

    let mut extended = tokenizer.with_code_appended("3 4");
    assert_eq!(extended.code(), "1 2\n3 4");
    let next = extended.next().unwrap().unwrap();
    assert_eq!(next.kind, TokenKind::Integer(3));
    assert_eq!(extended.next().unwrap().unwrap().kind, TokenKind::Integer(4));

    // the original cursor is untouched
    assert!(!tokenizer.has_next());
    assert_eq!(tokenizer.code(), "1 2");
}

#[test]
fn current_position_derives_line_and_column() {
    let mut tokenizer = Tokenizer::new("1\n  2");
    tokenizer.next().unwrap();
    assert_eq!(tokenizer.current_position(), (1, 0));
    tokenizer.next().unwrap();
    assert_eq!(tokenizer.current_position(), (2, 2));
}

#[test]
fn unmatchable_text_is_a_token_error() {
    let mut tokenizer = Tokenizer::new("1 § 2");
    tokenizer.next().unwrap();
    let error = tokenizer.next().unwrap_err();
    assert_eq!(error.cause, LexicalError::InvalidToken);
    assert_eq!(error.index, 2);
}

#[test]
fn oversized_literals_are_range_errors() {
    let mut tokenizer = Tokenizer::new("9223372036854775808");
    let error = tokenizer.next().unwrap_err();
    assert_eq!(error.cause, LexicalError::IntegerOutOfRange);
}

#[test]
fn parser_builds_nested_blocks() {
    let source = SourceFile::new("<literal>", "{ 1 { 2 } } 0");
    let nodes = parse(&source).unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].count(), 4);
}

#[test]
fn parser_rejects_unbalanced_blocks() {
    assert!(parse(&SourceFile::new("<literal>", "{ 1 2")).is_err());
    assert!(parse(&SourceFile::new("<literal>", "1 }")).is_err());

    let error = parse(&SourceFile::new("<literal>", "1 { 2")).unwrap_err();
    assert_eq!(error.index(), 2, "the opening brace is the offending offset");
}
