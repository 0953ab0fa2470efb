//! Built-in front end for C-family languages (Java, C)
//!
//! Both languages share one lexer, one bracket/statement parser and one
//! feature extractor; they differ only in their keyword tables.

pub mod features;
pub mod lexer;
pub mod parser;

pub use features::CLikeFeatures;
pub use lexer::Lexer;
pub use parser::Parser;

use crate::error::Result;
use crate::frontend::{FrontEnd, ParsedDocument};
use crate::token::TokenStream;

pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long", "native",
    "new", "package", "private", "protected", "public", "return", "short", "static", "strictfp",
    "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try", "void",
    "volatile", "while", "true", "false", "null",
];

pub const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else", "enum",
    "extern", "float", "for", "goto", "if", "inline", "int", "long", "register", "restrict",
    "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while",
];

#[derive(Debug, Clone, Copy)]
pub struct CLikeFrontEnd {
    keywords: &'static [&'static str],
}

impl CLikeFrontEnd {
    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self { keywords }
    }

    pub fn java() -> Self {
        Self::new(JAVA_KEYWORDS)
    }

    pub fn c() -> Self {
        Self::new(C_KEYWORDS)
    }
}

impl FrontEnd for CLikeFrontEnd {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Lexer::new(self.keywords).tokenize(text)
    }

    fn parse_tokens(&self, tokens: TokenStream) -> Result<ParsedDocument> {
        let tree = Parser::new(&tokens).parse()?;
        Ok(ParsedDocument::new(tokens, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_tables_differ() {
        let java = CLikeFrontEnd::java().tokenize("class x").unwrap();
        let c = CLikeFrontEnd::c().tokenize("class x").unwrap();
        assert_ne!(java.real(0).unwrap().token_type, lexer::IDENT);
        assert_eq!(c.real(0).unwrap().token_type, lexer::IDENT);
    }

    #[test]
    fn test_parse_keeps_all_text() {
        let src = "int f(int a) {\n  /* add */ return a + 1; // one\n}\n";
        let doc = CLikeFrontEnd::c().parse(src).unwrap();
        assert_eq!(doc.tokens.text(), src);
        assert_eq!(doc.real_count(), 13);
    }
}
