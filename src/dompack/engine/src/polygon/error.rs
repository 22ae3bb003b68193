use thiserror::Error;

/// Package does not follow expected Polygon layout
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("syntax error in {path}: {source}")]
    XmlSyn {
        path: String,
        #[source]
        source: roxmltree::Error,
    },
    #[error("multiple occurrences of `{0}` are found")]
    DuplicateTag(String),
    #[error("no occurrence of `{0}` is found")]
    MissingTag(String),
    #[error("`{tag}` does not have `{attribute}` attribute")]
    MissingAttribute { tag: String, attribute: String },
    #[error("`{tag}` has invalid value {value:?}")]
    BadValue { tag: String, value: String },
    #[error("testset declares {declared} tests, but contains {actual}")]
    CountMismatch { declared: usize, actual: usize },
    #[error("unknown solution tag `{0}`")]
    UnknownVerdict(String),
    #[error("unknown type `{0}` for build and run")]
    UnsupportedSourceType(String),
    #[error("there is no name in language `{0}`")]
    MissingName(String),
    #[error("bad path pattern {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: &'static str },
}
