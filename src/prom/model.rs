use std::collections::HashMap;

/// One observed data point from an exposition document.
///
/// The `help` field carries the help text that was active when the sample was
/// parsed, which may differ from the metric's cached metadata when a later
/// `# HELP` header changed the running context (see [`MetricMeta`]).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub value: f64,
    pub labels: HashMap<String, String>,
    pub help: String,
}

/// Cached help/type for a metric name, captured at the first sample seen for
/// that name. Later `# HELP`/`# TYPE` headers for the same name do not
/// overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricMeta {
    pub help: String,
    pub metric_type: String,
}

/// Why a sample line was dropped instead of decoded.
///
/// Dropping is silent towards the user; the reasons are kept on the index so
/// callers can inspect how much of a document was unparseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The line did not split into exactly a series part and a value token.
    BadShape,
    /// A `{` opened a label block that no later `}` closes.
    UnclosedLabels,
    /// The value token is not a floating point number.
    BadValue,
}
