use std::fmt;

/// Core error type for the homework status bot.
///
/// Adapter crates map their library errors into this type so the poll loop can
/// decide per kind whether a failure is logged only or reported to the user.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("homework API returned {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid API response: {0}")]
    Response(#[from] ResponseError),

    #[error("invalid homework record: {0}")]
    Status(#[from] StatusError),

    #[error("notification error: {0}")]
    Notify(String),
}

impl Error {
    /// Failures raised while fetching the payload (as opposed to interpreting it).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::HttpStatus { .. } | Error::Decode(_)
        )
    }
}

/// Shape violations of the `homework_statuses` payload.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("response is not a JSON object (got {0})")]
    NotAnObject(JsonKind),

    #[error("response is empty")]
    Empty,

    #[error("response has no `homeworks` key")]
    MissingHomeworks,

    #[error("`homeworks` is not a list (got {0})")]
    HomeworksNotAList(JsonKind),
}

/// Problems with a single homework record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("missing `{0}` key")]
    MissingField(&'static str),

    #[error("`{field}` must be a string (got {kind})")]
    WrongFieldType { field: &'static str, kind: JsonKind },

    #[error("homework status is empty")]
    EmptyStatus,

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),
}

/// JSON value kind, used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => JsonKind::Null,
            serde_json::Value::Bool(_) => JsonKind::Bool,
            serde_json::Value::Number(_) => JsonKind::Number,
            serde_json::Value::String(_) => JsonKind::String,
            serde_json::Value::Array(_) => JsonKind::Array,
            serde_json::Value::Object(_) => JsonKind::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "bool",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        f.write_str(s)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
