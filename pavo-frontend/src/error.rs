use pavo_ast::Span;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid source code")]
    InvalidSource { diagnostics: Vec<Diagnostic> },
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,

    pub message: String,

    pub span: Option<Span>,

    pub additional: Vec<Additional>,
}

impl Diagnostic {
    pub fn new<S: ToString>(message: S, code: DiagnosticCode) -> Self {
        Diagnostic {
            code,
            message: message.to_string(),
            span: None,
            additional: vec![],
        }
    }

    pub fn parse_error<S: ToString>(message: S) -> Self {
        Diagnostic::new(message, DiagnosticCode::PARSE)
    }

    pub fn name_error<S: ToString>(message: S) -> Self {
        Diagnostic::new(message, DiagnosticCode::NAME)
    }

    pub fn type_error<S: ToString>(message: S) -> Self {
        Diagnostic::new(message, DiagnosticCode::TYPE)
    }

    pub fn unsupported<S: ToString>(message: S) -> Self {
        Diagnostic::new(message, DiagnosticCode::UNSUPPORTED)
    }

    pub fn import_error<S: ToString>(message: S) -> Self {
        Diagnostic::new(message, DiagnosticCode::IMPORT)
    }

    pub fn value_error<S: ToString>(message: S) -> Self {
        Diagnostic::new(message, DiagnosticCode::VALUE)
    }

    /// Things that should never happen. Please file an issue.
    pub fn internal<S: ToString>(message: S) -> Self {
        Diagnostic::new(message, DiagnosticCode::INTERNAL)
    }

    pub fn into_error(self) -> Error {
        Error::InvalidSource {
            diagnostics: vec![self],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticCode(&'static str);

impl DiagnosticCode {
    pub const PARSE: DiagnosticCode = DiagnosticCode("E0001");
    pub const NAME: DiagnosticCode = DiagnosticCode("E0002");
    pub const TYPE: DiagnosticCode = DiagnosticCode("E0003");
    pub const UNSUPPORTED: DiagnosticCode = DiagnosticCode("E0004");
    pub const IMPORT: DiagnosticCode = DiagnosticCode("E0005");
    pub const VALUE: DiagnosticCode = DiagnosticCode("E0006");
    pub const INTERNAL: DiagnosticCode = DiagnosticCode("E0007");

    pub fn get(&self) -> &'static str {
        self.0
    }

    pub const fn get_severity(&self) -> Severity {
        match self.0.as_bytes()[0] {
            b'E' => Severity::Error,
            b'W' => Severity::Warning,
            _ => panic!(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Additional {
    pub message: String,

    pub span: Option<Span>,
}

pub trait WithErrorInfo: Sized {
    fn push_hint<S: Into<String>>(self, hint: S) -> Self;

    fn with_span(self, span: Option<Span>) -> Self;

    fn with_span_fallback(self, span: Option<Span>) -> Self;
}

impl WithErrorInfo for Diagnostic {
    fn push_hint<S: Into<String>>(mut self, hint: S) -> Self {
        self.additional.push(Additional {
            message: hint.into(),
            span: None,
        });
        self
    }

    fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    fn with_span_fallback(mut self, span: Option<Span>) -> Self {
        self.span = self.span.or(span);
        self
    }
}

impl<T, E: WithErrorInfo> WithErrorInfo for Result<T, E> {
    fn push_hint<S: Into<String>>(self, hint: S) -> Self {
        self.map_err(|e| e.push_hint(hint))
    }

    fn with_span(self, span: Option<Span>) -> Self {
        self.map_err(|e| e.with_span(span))
    }

    fn with_span_fallback(self, span: Option<Span>) -> Self {
        self.map_err(|e| e.with_span_fallback(span))
    }
}

impl From<pavo_ir::GraphError> for Diagnostic {
    fn from(err: pavo_ir::GraphError) -> Self {
        Diagnostic::internal(err.to_string())
    }
}
