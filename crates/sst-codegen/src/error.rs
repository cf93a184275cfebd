use thiserror::Error;

/// A build-time failure from one of the text-format compilers (gamedata,
/// entity properties). Carries enough location info that a `build.rs` can
/// report something actionable before aborting the build.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: indentation must use tabs, not spaces")]
    SpaceIndent { line: usize },
    #[error("line {line}: exceeded max nesting level (255)")]
    TooDeep { line: usize },
    #[error("line {line}: excessive indentation (skipped a level)")]
    ExcessiveIndent { line: usize },
    #[error("line {line}: missing a value and/or nested conditional(s)")]
    MissingValue { line: usize },
    #[error("line {line}: invalid text file (missing trailing newline)")]
    MissingEol { line: usize },
    #[error("line {line}: network name not in class/property format")]
    BadNetworkName { line: usize },
    #[error("line {line}: duplicate property name")]
    DuplicateProperty { line: usize },
    #[error("line {line}: unexpected blank key")]
    EmptyKey { line: usize },
}

/// A failure scanning or validating the feature/event macro surface
/// (component K).
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("{file}:{line}:{column}: {message}")]
    Syntax { file: String, line: usize, column: usize, message: String },
    #[error("feature `{0}` is required by another feature but has no init!")]
    RequireWithoutInit(String),
    #[error("feature `{0}` declares both preinit! and require!/request!")]
    PreinitWithRequire(String),
    #[error("duplicate description for feature `{0}`")]
    DuplicateDescription(String),
    #[error("event `{0}` is defined more than once")]
    DuplicateEvent(String),
    #[error("event `{0}` is handled but never defined")]
    UnknownEvent(String),
    #[error("handle_event!({0}, ...) is missing its handler function name")]
    MissingHandlerFn(String),
    #[error("dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    #[error("unknown dependency `{dep}` referenced by feature `{feature}`")]
    UnknownDependency { feature: String, dep: String },
    #[error("failed to read `{path}`: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
pub type CodegenResult<T> = std::result::Result<T, CodegenError>;
