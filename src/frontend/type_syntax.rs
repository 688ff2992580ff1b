//! Parser for C# type names as written in manifests.
//!
//! Grammar:
//!
//! ```text
//! type    := primary suffix*
//! primary := '(' type (',' type)+ ')'
//!          | ['global' '::'] segment ('.' segment)*
//! segment := IDENT ['<' type (',' type)* '>']
//! suffix  := '?' | '[' ','* ']'
//! ```
//!
//! A single-segment name that is a predefined keyword (`int`), or a dotted metadata name of a
//! predefined type (`System.Int32`), produces [`TypeRef::Predefined`].

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use throwgen_core::predefined;

use super::types::{NameSegment, TypeRef};

/// Deepest nesting of tuples and generic arguments a type name may use.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A malformed type name.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TypeSyntaxError {
    #[error("unexpected character `{ch}` in type name")]
    #[diagnostic(code(throwgen::type_syntax::character))]
    UnexpectedCharacter {
        ch: char,
        #[label("not valid in a type name")]
        span: SourceSpan,
    },

    #[error("expected {expected} in type name, found {found}")]
    #[diagnostic(code(throwgen::type_syntax::unexpected))]
    Unexpected {
        expected: &'static str,
        found: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("type name nests deeper than {limit} levels")]
    #[diagnostic(code(throwgen::type_syntax::too_deep))]
    TooDeep {
        limit: usize,
        #[label("limit reached here")]
        span: SourceSpan,
    },

    #[error("tuple types need at least two elements")]
    #[diagnostic(code(throwgen::type_syntax::tuple), help("write the element type without parentheses"))]
    SingleElementTuple {
        #[label("one element")]
        span: SourceSpan,
    },
}

impl TypeSyntaxError {
    /// Span of the offending text within the type name.
    pub fn span(&self) -> SourceSpan {
        match self {
            TypeSyntaxError::UnexpectedCharacter { span, .. }
            | TypeSyntaxError::Unexpected { span, .. }
            | TypeSyntaxError::TooDeep { span, .. }
            | TypeSyntaxError::SingleElementTuple { span } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Dot,
    Comma,
    ColonColon,
    Lt,
    Gt,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Question,
    Eof,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("`{name}`"),
            TokenKind::Dot => "`.`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::ColonColon => "`::`".to_string(),
            TokenKind::Lt => "`<`".to_string(),
            TokenKind::Gt => "`>`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Question => "`?`".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
    len: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn lex(source: &str) -> Result<Vec<Token>, TypeSyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let single = |kind| Token { kind, offset, len: 1 };
        match c {
            c if c.is_whitespace() => {}
            '.' => tokens.push(single(TokenKind::Dot)),
            ',' => tokens.push(single(TokenKind::Comma)),
            '<' => tokens.push(single(TokenKind::Lt)),
            '>' => tokens.push(single(TokenKind::Gt)),
            '(' => tokens.push(single(TokenKind::LParen)),
            ')' => tokens.push(single(TokenKind::RParen)),
            '[' => tokens.push(single(TokenKind::LBracket)),
            ']' => tokens.push(single(TokenKind::RBracket)),
            '?' => tokens.push(single(TokenKind::Question)),
            ':' if matches!(chars.peek(), Some((_, ':'))) => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::ColonColon,
                    offset,
                    len: 2,
                });
            }
            c if is_ident_start(c) => {
                let mut end = offset + c.len_utf8();
                while let Some(&(next_offset, next)) = chars.peek() {
                    if !is_ident_continue(next) {
                        break;
                    }
                    end = next_offset + next.len_utf8();
                    chars.next();
                }
                // Verbatim identifiers (`@class`) name the bare word.
                let text = source[offset..end].trim_start_matches('@').to_string();
                if text.is_empty() {
                    return Err(TypeSyntaxError::UnexpectedCharacter {
                        ch: '@',
                        span: (offset, 1).into(),
                    });
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(text),
                    offset,
                    len: end - offset,
                });
            }
            other => {
                return Err(TypeSyntaxError::UnexpectedCharacter {
                    ch: other,
                    span: (offset, other.len_utf8()).into(),
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
        len: 0,
    });
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof and the parser never advances past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &'static str) -> TypeSyntaxError {
        let token = self.peek();
        TypeSyntaxError::Unexpected {
            expected,
            found: token.kind.describe(),
            span: (token.offset, token.len).into(),
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), TypeSyntaxError> {
        if self.eat(kind) { Ok(()) } else { Err(self.unexpected(expected)) }
    }

    fn ident(&mut self) -> Result<String, TypeSyntaxError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("a type name")),
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeSyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            let token = self.peek();
            return Err(TypeSyntaxError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                span: (token.offset, token.len).into(),
            });
        }
        self.depth += 1;
        let result = self.parse_suffixed();
        self.depth -= 1;
        result
    }

    fn parse_suffixed(&mut self) -> Result<TypeRef, TypeSyntaxError> {
        let mut ty = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::Question) {
                ty = TypeRef::Nullable(Box::new(ty));
            } else if self.eat(&TokenKind::LBracket) {
                let mut rank = 1;
                while self.eat(&TokenKind::Comma) {
                    rank += 1;
                }
                self.expect(&TokenKind::RBracket, "`]`")?;
                ty = TypeRef::Array {
                    element: Box::new(ty),
                    rank,
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<TypeRef, TypeSyntaxError> {
        let start = self.peek().offset;
        if self.eat(&TokenKind::LParen) {
            let mut elements = vec![self.parse_type()?];
            while self.eat(&TokenKind::Comma) {
                elements.push(self.parse_type()?);
            }
            let end = self.peek().offset + self.peek().len;
            self.expect(&TokenKind::RParen, "`)` or `,`")?;
            if elements.len() < 2 {
                return Err(TypeSyntaxError::SingleElementTuple {
                    span: (start, end - start).into(),
                });
            }
            return Ok(TypeRef::Tuple(elements));
        }

        let mut first = self.ident()?;
        if first == "global" && self.eat(&TokenKind::ColonColon) {
            first = self.ident()?;
        }
        let mut segments = vec![self.parse_segment(first)?];
        while self.eat(&TokenKind::Dot) {
            let name = self.ident()?;
            segments.push(self.parse_segment(name)?);
        }
        Ok(normalize(segments))
    }

    fn parse_segment(&mut self, name: String) -> Result<NameSegment, TypeSyntaxError> {
        let mut type_args = Vec::new();
        if self.eat(&TokenKind::Lt) {
            type_args.push(self.parse_type()?);
            while self.eat(&TokenKind::Comma) {
                type_args.push(self.parse_type()?);
            }
            self.expect(&TokenKind::Gt, "`>` or `,`")?;
        }
        Ok(NameSegment::generic(name, type_args))
    }
}

fn normalize(segments: Vec<NameSegment>) -> TypeRef {
    if segments.iter().all(|s| s.type_args.is_empty()) {
        if let [only] = segments.as_slice() {
            if let Some(p) = predefined::from_keyword(&only.name) {
                return TypeRef::Predefined(p);
            }
        }
        let dotted: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
        if let Some(p) = predefined::from_metadata_name(&dotted.join(".")) {
            return TypeRef::Predefined(p);
        }
    }
    TypeRef::Named(segments)
}

/// Parse a type name.
pub fn parse_type(source: &str) -> Result<TypeRef, TypeSyntaxError> {
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let ty = parser.parse_type()?;
    if parser.peek().kind != TokenKind::Eof {
        return Err(parser.unexpected("end of type name"));
    }
    Ok(ty)
}

/// Parse a type name that must be a plain dotted name (`System.ArgumentException`), as used for type
/// declarations and marker type arguments.
pub fn parse_named_type(source: &str) -> Result<TypeRef, TypeSyntaxError> {
    match parse_type(source)? {
        ty @ (TypeRef::Named(_) | TypeRef::Predefined(_)) => Ok(ty),
        _ => Err(TypeSyntaxError::Unexpected {
            expected: "a named type",
            found: format!("`{}`", source.trim()),
            span: (0, source.len()).into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use throwgen_core::predefined::PredefinedType;

    fn fq(source: &str) -> String {
        parse_type(source).unwrap().fully_qualified()
    }

    #[test]
    fn test_predefined_keywords() {
        assert_eq!(parse_type("string").unwrap(), TypeRef::Predefined(PredefinedType::String));
        assert_eq!(parse_type("int").unwrap(), TypeRef::Predefined(PredefinedType::Int32));
    }

    #[test]
    fn test_metadata_names_of_predefined_types() {
        assert_eq!(fq("System.Int32"), "int");
        assert_eq!(fq("global::System.Object"), "object");
    }

    #[test]
    fn test_dotted_names() {
        assert_eq!(fq("System.ArgumentException"), "global::System.ArgumentException");
        assert_eq!(fq("global::App.Errors.Fault"), "global::App.Errors.Fault");
        assert_eq!(fq(" System . Exception "), "global::System.Exception");
    }

    #[test]
    fn test_generics() {
        assert_eq!(
            fq("System.Collections.Generic.IDictionary<string, System.Collections.Generic.List<int>>"),
            "global::System.Collections.Generic.IDictionary<string, global::System.Collections.Generic.List<int>>"
        );
        assert_eq!(fq("Outer<int>.Inner"), "global::Outer<int>.Inner");
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(fq("string[]"), "string[]");
        assert_eq!(fq("int[,,]"), "int[,,]");
        assert_eq!(fq("int?"), "int?");
        assert_eq!(fq("int?[]"), "int?[]");
        assert_eq!(fq("System.Exception[][]"), "global::System.Exception[][]");
    }

    #[test]
    fn test_tuples() {
        assert_eq!(fq("(int, string)"), "(int, string)");
        assert_eq!(fq("(int, (bool, char))?"), "(int, (bool, char))?");
    }

    #[test]
    fn test_verbatim_identifier() {
        assert_eq!(fq("App.@event.Fault"), "global::App.event.Fault");
    }

    #[test]
    fn test_single_element_tuple_is_rejected() {
        assert!(matches!(parse_type("(int)"), Err(TypeSyntaxError::SingleElementTuple { .. })));
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse_type("int*").unwrap_err();
        assert_eq!(
            err,
            TypeSyntaxError::UnexpectedCharacter {
                ch: '*',
                span: (3, 1).into()
            }
        );
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(matches!(parse_type("int string"), Err(TypeSyntaxError::Unexpected { .. })));
    }

    fn nested_tuple(levels: usize) -> String {
        format!("{}int{}", "(".repeat(levels), ", int)".repeat(levels))
    }

    #[test]
    fn test_nesting_up_to_the_limit_parses() {
        let ty = parse_type(&nested_tuple(MAX_NESTING_DEPTH - 1)).unwrap();
        assert!(matches!(ty, TypeRef::Tuple(_)));
    }

    #[test]
    fn test_nesting_past_the_limit_is_rejected() {
        let err = parse_type(&nested_tuple(MAX_NESTING_DEPTH)).unwrap_err();
        assert_eq!(
            err,
            TypeSyntaxError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                span: (MAX_NESTING_DEPTH, 3).into(),
            }
        );
    }

    #[test]
    fn test_huge_nesting_fails_without_overflow() {
        let err = parse_type(&nested_tuple(200_000)).unwrap_err();
        assert!(matches!(err, TypeSyntaxError::TooDeep { .. }), "{err}");

        let generic = format!("{}int{}", "List<".repeat(200_000), ">".repeat(200_000));
        let err = parse_type(&generic).unwrap_err();
        assert!(matches!(err, TypeSyntaxError::TooDeep { .. }), "{err}");
    }

    #[test]
    fn test_unclosed_generic() {
        let err = parse_type("List<int").unwrap_err();
        assert!(err.to_string().contains("end of input"), "{err}");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_type("").is_err());
        assert!(parse_type("   ").is_err());
    }

    #[test]
    fn test_named_type_rejects_arrays() {
        assert!(parse_named_type("System.Exception[]").is_err());
        assert!(parse_named_type("System.Exception").is_ok());
    }
}
