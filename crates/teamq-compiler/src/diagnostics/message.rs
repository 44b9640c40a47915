use rowan::TextRange;

use crate::SourceId;

/// Diagnostic kinds, grouped by the stage that reports them.
///
/// Parse kinds abort compilation of the whole file they occur in.
/// Validation kinds reject the query they occur in. Both are fatal for
/// the run, but every file is still scanned so all problems are reported
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Scanner: malformed directives and statements
    OrphanStatement,
    MalformedNameDirective,
    UnknownCardinality,
    MalformedParamDirective,
    ParamOutsideHeader,
    EmptyStatement,

    // Scanner: fragment delimiters
    NestedFragment,
    UnclosedFragment,
    UnmatchedFragmentClose,

    // Model builder: cross-reference validation
    InvalidQueryName,
    DuplicateQuery,
    DuplicateParameter,
    UndeclaredParameter,
    UnusedParameter,
    NonBooleanGate,
    DuplicateModule,

    // Advisory
    UnknownParamType,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnknownParamType => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Parse errors abort the file they occur in.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::OrphanStatement
                | Self::MalformedNameDirective
                | Self::UnknownCardinality
                | Self::MalformedParamDirective
                | Self::ParamOutsideHeader
                | Self::EmptyStatement
                | Self::NestedFragment
                | Self::UnclosedFragment
                | Self::UnmatchedFragmentClose
        )
    }

    /// Validation errors reject the query they occur in.
    pub fn is_validation_error(&self) -> bool {
        self.default_severity() == Severity::Error && !self.is_parse_error()
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::OrphanStatement => Some("start each query with `-- name: <Name> :<one|many|exec>`"),
            Self::MalformedNameDirective => Some("e.g., `-- name: GetAuthor :one`"),
            Self::UnknownCardinality => Some("use one of `:one`, `:many`, `:exec`"),
            Self::MalformedParamDirective => Some("e.g., `-- param: post_id int Post to list`"),
            Self::NestedFragment => Some("close the outer fragment with `-- }` first"),
            Self::UnusedParameter => Some("reference it as `:name` or remove the directive"),
            Self::NonBooleanGate => Some("fragment gates must be declared `bool`"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::OrphanStatement => "statement has no `-- name:` directive",
            Self::MalformedNameDirective => "malformed `name:` directive",
            Self::UnknownCardinality => "unknown cardinality",
            Self::MalformedParamDirective => "malformed `param:` directive",
            Self::ParamOutsideHeader => "`param:` directive outside a query header",
            Self::EmptyStatement => "query has no statement",

            Self::NestedFragment => "fragments cannot be nested",
            Self::UnclosedFragment => "fragment is never closed",
            Self::UnmatchedFragmentClose => "`-- }` has no matching fragment",

            Self::InvalidQueryName => "query name is not an identifier",
            Self::DuplicateQuery => "duplicate query",
            Self::DuplicateParameter => "duplicate parameter",
            Self::UndeclaredParameter => "undeclared parameter",
            Self::UnusedParameter => "unused parameter",
            Self::NonBooleanGate => "fragment gate is not boolean",
            Self::DuplicateModule => "duplicate module name",

            Self::UnknownParamType => "unknown parameter type",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnknownCardinality => "unknown cardinality `{}`".to_string(),
            Self::InvalidQueryName => "query name `{}` is not an identifier".to_string(),
            Self::DuplicateQuery => "query `{}` is already defined in this file".to_string(),
            Self::DuplicateParameter => "parameter `{}` is already declared".to_string(),
            Self::UndeclaredParameter => "{}".to_string(),
            Self::UnusedParameter => "{}".to_string(),
            Self::NonBooleanGate => "{}".to_string(),
            Self::DuplicateModule => "module `{}` is produced by more than one file".to_string(),
            Self::UnknownParamType => "unknown parameter type `{}`".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Which source file this diagnostic belongs to.
    pub(crate) source: SourceId,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(
        source: SourceId,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source,
            range,
            message: message.into(),
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub(crate) fn with_default_message(
        source: SourceId,
        kind: DiagnosticKind,
        range: TextRange,
    ) -> Self {
        Self::new(source, kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
