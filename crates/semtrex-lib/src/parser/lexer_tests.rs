use super::lexer::{lex, token_text};

fn snapshot(input: &str) -> String {
    match lex(input) {
        Ok(tokens) => tokens
            .iter()
            .map(|t| format!("{:?} {:?}\n", t.kind, token_text(input, t)))
            .collect(),
        Err(e) => format!("error: {e}\n"),
    }
}

#[test]
fn punctuation() {
    insta::assert_snapshot!(snapshot("/ % . , | * + ? ~ ! = ( ) { } < > :"), @r#"
    Slash "/"
    Percent "%"
    Dot "."
    Comma ","
    Pipe "|"
    Star "*"
    Plus "+"
    Question "?"
    Tilde "~"
    Bang "!"
    Equals "="
    ParenOpen "("
    ParenClose ")"
    BraceOpen "{"
    BraceClose "}"
    AngleOpen "<"
    AngleClose ">"
    Colon ":"
    "#);
}

#[test]
fn a_whole_pattern() {
    insta::assert_snapshot!(snapshot("/TASK/(TITLE,STATUS,.*)"), @r#"
    Slash "/"
    Label "TASK"
    Slash "/"
    ParenOpen "("
    Label "TITLE"
    Comma ","
    Label "STATUS"
    Comma ","
    Dot "."
    Star "*"
    ParenClose ")"
    "#);
}

#[test]
fn bang_equals_is_two_tokens() {
    insta::assert_snapshot!(snapshot("A!=42"), @r#"
    Label "A"
    Bang "!"
    Equals "="
    Integer "42"
    "#);
}

#[test]
fn numbers() {
    insta::assert_snapshot!(snapshot("42 -7 42.25 -0.5"), @r#"
    Integer "42"
    Integer "-7"
    Float "42.25"
    Float "-0.5"
    "#);
}

#[test]
fn integer_then_dot_is_not_a_float() {
    insta::assert_snapshot!(snapshot("42."), @r#"
    Integer "42"
    Dot "."
    "#);
}

#[test]
fn labels() {
    insta::assert_snapshot!(snapshot("foo Bar_Baz _x t123"), @r#"
    Label "foo"
    Label "Bar_Baz"
    Label "_x"
    Label "t123"
    "#);
}

#[test]
fn char_literal() {
    insta::assert_snapshot!(snapshot("'x'"), @r#"
    CharLit "'x'"
    "#);
}

#[test]
fn string_literal_with_escapes() {
    insta::assert_snapshot!(snapshot(r#""say \"hi\"\n""#), @r#"
    StringLit "\"say \\\"hi\\\"\\n\""
    "#);
}

#[test]
fn whitespace_is_skipped() {
    insta::assert_snapshot!(snapshot("  A ,\n\tB  "), @r#"
    Label "A"
    Comma ","
    Label "B"
    "#);
}

#[test]
fn unexpected_character() {
    insta::assert_snapshot!(snapshot("A @ B"), @"error: unexpected character at byte 2");
}

#[test]
fn unterminated_string() {
    insta::assert_snapshot!(snapshot(r#"A,"abc"#), @"error: unterminated string literal starting at byte 2");
}

#[test]
fn unterminated_char() {
    insta::assert_snapshot!(snapshot("'a"), @"error: unterminated char literal starting at byte 0");
}
