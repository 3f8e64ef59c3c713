//! Token types for the SQL lexer.

use std::fmt;

use super::{Location, Span};

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// SQL keywords known to either dialect.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the canonical upper-case spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    All => "ALL",
    Analyze => "ANALYZE",
    And => "AND",
    Any => "ANY",
    Array => "ARRAY",
    As => "AS",
    Asc => "ASC",
    Between => "BETWEEN",
    By => "BY",
    Case => "CASE",
    Cast => "CAST",
    Catalogs => "CATALOGS",
    Cluster => "CLUSTER",
    Columns => "COLUMNS",
    Create => "CREATE",
    Cross => "CROSS",
    Current => "CURRENT",
    CurrentDate => "CURRENT_DATE",
    CurrentTime => "CURRENT_TIME",
    CurrentTimestamp => "CURRENT_TIMESTAMP",
    Date => "DATE",
    Day => "DAY",
    Delete => "DELETE",
    Desc => "DESC",
    Describe => "DESCRIBE",
    Distinct => "DISTINCT",
    Distribute => "DISTRIBUTE",
    Drop => "DROP",
    Else => "ELSE",
    End => "END",
    Escape => "ESCAPE",
    Except => "EXCEPT",
    Exists => "EXISTS",
    Explain => "EXPLAIN",
    False => "FALSE",
    Filter => "FILTER",
    First => "FIRST",
    Following => "FOLLOWING",
    From => "FROM",
    Full => "FULL",
    Group => "GROUP",
    Having => "HAVING",
    Hour => "HOUR",
    If => "IF",
    In => "IN",
    Inner => "INNER",
    Insert => "INSERT",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Into => "INTO",
    Is => "IS",
    Join => "JOIN",
    Last => "LAST",
    Lateral => "LATERAL",
    Left => "LEFT",
    Like => "LIKE",
    Limit => "LIMIT",
    Localtime => "LOCALTIME",
    Localtimestamp => "LOCALTIMESTAMP",
    Map => "MAP",
    Minute => "MINUTE",
    Month => "MONTH",
    Natural => "NATURAL",
    Not => "NOT",
    Null => "NULL",
    Nulls => "NULLS",
    On => "ON",
    Or => "OR",
    Order => "ORDER",
    Ordinality => "ORDINALITY",
    Outer => "OUTER",
    Over => "OVER",
    Overwrite => "OVERWRITE",
    Partition => "PARTITION",
    Preceding => "PRECEDING",
    Range => "RANGE",
    Recursive => "RECURSIVE",
    Regexp => "REGEXP",
    Reset => "RESET",
    Right => "RIGHT",
    Rlike => "RLIKE",
    Row => "ROW",
    Rows => "ROWS",
    Schemas => "SCHEMAS",
    Second => "SECOND",
    Select => "SELECT",
    Session => "SESSION",
    Set => "SET",
    Show => "SHOW",
    Some => "SOME",
    Sort => "SORT",
    Table => "TABLE",
    Tables => "TABLES",
    Then => "THEN",
    Time => "TIME",
    Timestamp => "TIMESTAMP",
    To => "TO",
    True => "TRUE",
    TryCast => "TRY_CAST",
    Unbounded => "UNBOUNDED",
    Union => "UNION",
    Unnest => "UNNEST",
    Use => "USE",
    Using => "USING",
    Values => "VALUES",
    View => "VIEW",
    When => "WHEN",
    Where => "WHERE",
    With => "WITH",
    Year => "YEAR",
}

impl Keyword {
    /// Returns true if the keyword can never be used as an unquoted identifier.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::And
                | Self::As
                | Self::Between
                | Self::By
                | Self::Case
                | Self::Cast
                | Self::Create
                | Self::Cross
                | Self::CurrentDate
                | Self::CurrentTime
                | Self::CurrentTimestamp
                | Self::Delete
                | Self::Describe
                | Self::Distinct
                | Self::Drop
                | Self::Else
                | Self::End
                | Self::Escape
                | Self::Except
                | Self::Exists
                | Self::False
                | Self::From
                | Self::Full
                | Self::Group
                | Self::Having
                | Self::In
                | Self::Inner
                | Self::Insert
                | Self::Intersect
                | Self::Into
                | Self::Is
                | Self::Join
                | Self::Left
                | Self::Like
                | Self::Localtime
                | Self::Localtimestamp
                | Self::Natural
                | Self::Not
                | Self::Null
                | Self::On
                | Self::Or
                | Self::Order
                | Self::Outer
                | Self::Recursive
                | Self::Right
                | Self::Select
                | Self::Table
                | Self::Then
                | Self::True
                | Self::Union
                | Self::Unnest
                | Self::Using
                | Self::Values
                | Self::When
                | Self::Where
                | Self::With
        )
    }

    /// Returns true if the keyword only exists in the Hive dialect.
    ///
    /// All Hive-only keywords are non-reserved.
    #[must_use]
    pub const fn is_hive_only(&self) -> bool {
        matches!(
            self,
            Self::Cluster
                | Self::Distribute
                | Self::Overwrite
                | Self::Regexp
                | Self::Rlike
                | Self::Sort
                | Self::View
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds.
///
/// Tokens carry no payload: the original text lives on [`Token::text`] and the
/// AST builder derives values from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A keyword recognised by the active dialect.
    Keyword(Keyword),
    /// Unquoted identifier.
    Identifier,
    /// Double-quoted identifier (`"name"`).
    QuotedIdentifier,
    /// Back-quoted identifier (`` `name` ``).
    BackquotedIdentifier,
    /// Identifier starting with a digit (`20171014_tmp`).
    DigitIdentifier,
    /// String literal (`'text'`).
    String,
    /// Binary literal (`X'CAFE'`).
    BinaryLiteral,
    /// Integer literal.
    Integer,
    /// Decimal literal without exponent (`1.5`).
    Decimal,
    /// Floating point literal with exponent (`1.5E3`).
    Double,

    /// `=` (and `==` in Hive).
    Eq,
    /// `<>` or `!=`.
    Neq,
    /// `<`.
    Lt,
    /// `<=`.
    Lte,
    /// `>`.
    Gt,
    /// `>=`.
    Gte,
    /// `+`.
    Plus,
    /// `-`.
    Minus,
    /// `*`.
    Asterisk,
    /// `/`.
    Slash,
    /// `%`.
    Percent,
    /// `||`.
    Concat,
    /// `->`.
    Arrow,

    /// `(`.
    LeftParen,
    /// `)`.
    RightParen,
    /// `[`.
    LeftBracket,
    /// `]`.
    RightBracket,
    /// `,`.
    Comma,
    /// `.`.
    Dot,
    /// `;`.
    Semicolon,
    /// `?`.
    Question,

    /// End of input.
    Eof,
    /// Input the lexer could not recognise.
    Error,
}

impl TokenKind {
    /// Returns the vocabulary name used in error messages.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = match self {
            Self::Keyword(keyword) => return format!("'{keyword}'"),
            Self::Identifier => "IDENTIFIER",
            Self::QuotedIdentifier => "QUOTED_IDENTIFIER",
            Self::BackquotedIdentifier => "BACKQUOTED_IDENTIFIER",
            Self::DigitIdentifier => "DIGIT_IDENTIFIER",
            Self::String => "STRING",
            Self::BinaryLiteral => "BINARY_LITERAL",
            Self::Integer => "INTEGER_VALUE",
            Self::Decimal => "DECIMAL_VALUE",
            Self::Double => "DOUBLE_VALUE",
            Self::Eq => "'='",
            Self::Neq => "'<>'",
            Self::Lt => "'<'",
            Self::Lte => "'<='",
            Self::Gt => "'>'",
            Self::Gte => "'>='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Asterisk => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Concat => "'||'",
            Self::Arrow => "'->'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Semicolon => "';'",
            Self::Question => "'?'",
            Self::Eof => "<EOF>",
            Self::Error => "<error>",
        };
        name.to_string()
    }

    /// Returns true for the four identifier token kinds.
    #[must_use]
    pub const fn is_identifier_like(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::QuotedIdentifier
                | Self::BackquotedIdentifier
                | Self::DigitIdentifier
        )
    }

    /// Returns true if a `.field` dereference may follow a token of this kind.
    #[must_use]
    pub const fn ends_operand(&self) -> bool {
        match self {
            Self::Keyword(keyword) => !keyword.is_reserved(),
            Self::Identifier
            | Self::QuotedIdentifier
            | Self::BackquotedIdentifier
            | Self::DigitIdentifier
            | Self::RightParen
            | Self::RightBracket => true,
            _ => false,
        }
    }
}

/// A token with its kind, original text and source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The original source text of the token.
    pub text: String,
    /// Byte span in the source.
    pub span: Span,
    /// Line and column of the first character.
    pub location: Location,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, location: Location) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            location,
        }
    }

    /// Returns the keyword if this token is one.
    #[must_use]
    pub const fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }

    /// Returns the text shown for this token in error messages.
    #[must_use]
    pub fn error_text(&self) -> &str {
        if self.kind == TokenKind::Eof {
            "<EOF>"
        } else {
            &self.text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str_is_case_insensitive() {
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("try_cast"), Some(Keyword::TryCast));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_round_trips_through_text() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_str(keyword.as_str()), Some(*keyword));
        }
    }

    #[test]
    fn test_hive_only_keywords_are_non_reserved() {
        for keyword in Keyword::ALL.iter().filter(|k| k.is_hive_only()) {
            assert!(!keyword.is_reserved(), "{keyword} must be non-reserved");
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::Keyword(Keyword::From).display_name(), "'FROM'");
        assert_eq!(TokenKind::Comma.display_name(), "','");
        assert_eq!(TokenKind::Integer.display_name(), "INTEGER_VALUE");
        assert_eq!(TokenKind::Eof.display_name(), "<EOF>");
    }
}
