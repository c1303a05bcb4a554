use std::collections::HashMap;

use log::debug;
use regex::Regex;

use super::model::{MetricMeta, MetricSample, SkipReason};

const HELP_MARKER: &str = "# HELP ";
const TYPE_MARKER: &str = "# TYPE ";

/// `key="value"` label pairs: word-character keys, values run until the next
/// unescaped quote.
const LABEL_PATTERN: &str = r#"(\w+)="((?:\\.|[^"\\])*)""#;

/// What one line of exposition text is.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Help { metric: &'a str, text: &'a str },
    Type { metric: &'a str, token: &'a str },
    Sample(&'a str),
    Skip,
}

/// Outcome of decoding one sample line.
#[derive(Debug, PartialEq)]
pub(crate) enum Decoded {
    Sample {
        name: String,
        value: f64,
        labels: HashMap<String, String>,
    },
    Skip(SkipReason),
}

/// Everything one parse pass produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
    pub samples: Vec<MetricSample>,
    pub metadata: HashMap<String, MetricMeta>,
    pub skipped: Vec<SkipReason>,
}

pub(crate) fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(HELP_MARKER) {
        // A header with no space after the metric name carries no text;
        // drop it rather than abort the pass.
        return match rest.split_once(' ') {
            Some((metric, text)) => Line::Help { metric, text },
            None => Line::Skip,
        };
    }
    if let Some(rest) = line.strip_prefix(TYPE_MARKER) {
        return match rest.split_once(' ') {
            Some((metric, token)) => Line::Type { metric, token },
            None => Line::Skip,
        };
    }
    if line.starts_with('#') || line.trim().is_empty() {
        return Line::Skip;
    }
    Line::Sample(line)
}

pub(crate) fn decode(line: &str, label_re: &Regex) -> Decoded {
    let mut parts = line.split(' ');
    let (series, value_token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(series), Some(value), None) => (series, value),
        _ => return Decoded::Skip(SkipReason::BadShape),
    };

    let (name, labels) = match series.find('{') {
        Some(open) => {
            // The last `}` closes the block, so literal braces inside label
            // values survive.
            let close = match series.rfind('}') {
                Some(close) if close > open => close,
                _ => return Decoded::Skip(SkipReason::UnclosedLabels),
            };
            (&series[..open], decode_labels(&series[open + 1..close], label_re))
        }
        None => (series, HashMap::new()),
    };

    match value_token.parse::<f64>() {
        Ok(value) => Decoded::Sample {
            name: name.to_string(),
            value,
            labels,
        },
        Err(_) => Decoded::Skip(SkipReason::BadValue),
    }
}

fn decode_labels(raw: &str, label_re: &Regex) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    for pair in label_re.captures_iter(raw) {
        // Duplicate keys overwrite; last occurrence wins.
        labels.insert(pair[1].to_string(), pair[2].to_string());
    }
    labels
}

/// Parse a full exposition document in one sequential pass.
///
/// The running help/type context is a single pair applied to every subsequent
/// sample regardless of its name. Interleaved documents can therefore
/// attribute help text to samples of an unrelated metric; this mirrors the
/// one-pass reading of the format and is kept deliberately.
///
/// Metadata is cached once per metric name, at its first sample. Unparseable
/// sample lines are dropped and their reasons collected; nothing here fails.
pub fn parse(text: &str) -> Parsed {
    let label_re = Regex::new(LABEL_PATTERN).expect("valid label pattern");

    let mut parsed = Parsed::default();
    let mut current_help = String::new();
    let mut current_type = String::new();

    for line in text.lines() {
        match classify(line) {
            Line::Help { text, .. } => current_help = text.to_string(),
            Line::Type { token, .. } => current_type = token.to_string(),
            Line::Skip => {}
            Line::Sample(raw) => match decode(raw, &label_re) {
                Decoded::Sample {
                    name,
                    value,
                    labels,
                } => {
                    if !parsed.metadata.contains_key(&name) {
                        parsed.metadata.insert(
                            name.clone(),
                            MetricMeta {
                                help: current_help.clone(),
                                metric_type: current_type.clone(),
                            },
                        );
                    }
                    parsed.samples.push(MetricSample {
                        name,
                        value,
                        labels,
                        help: current_help.clone(),
                    });
                }
                Decoded::Skip(reason) => {
                    debug!("dropping unparseable sample line {raw:?}: {reason:?}");
                    parsed.skipped.push(reason);
                }
            },
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_re() -> Regex {
        Regex::new(LABEL_PATTERN).expect("valid label pattern")
    }

    #[test]
    fn classifies_headers_comments_and_samples() {
        assert_eq!(
            classify("# HELP node_load1 1m load average."),
            Line::Help {
                metric: "node_load1",
                text: "1m load average."
            }
        );
        assert_eq!(
            classify("# TYPE node_load1 gauge"),
            Line::Type {
                metric: "node_load1",
                token: "gauge"
            }
        );
        assert_eq!(classify("# plain comment"), Line::Skip);
        assert_eq!(classify(""), Line::Skip);
        assert_eq!(classify("   "), Line::Skip);
        assert_eq!(classify("node_load1 0.42"), Line::Sample("node_load1 0.42"));
    }

    #[test]
    fn header_without_help_text_is_dropped_not_fatal() {
        assert_eq!(classify("# HELP node_load1"), Line::Skip);
        assert_eq!(classify("# TYPE node_load1"), Line::Skip);
    }

    #[test]
    fn help_text_may_contain_further_spaces_or_be_empty() {
        assert_eq!(
            classify("# HELP up Whether the scrape succeeded."),
            Line::Help {
                metric: "up",
                text: "Whether the scrape succeeded."
            }
        );
        assert_eq!(classify("# HELP up "), Line::Help { metric: "up", text: "" });
    }

    #[test]
    fn decodes_plain_sample_without_labels() {
        assert_eq!(
            decode("node_load1 0.42", &label_re()),
            Decoded::Sample {
                name: "node_load1".to_string(),
                value: 0.42,
                labels: HashMap::new(),
            }
        );
    }

    #[test]
    fn decodes_labels_in_textual_order_last_duplicate_wins() {
        let decoded = decode(
            r#"node_cpu_seconds_total{cpu="0",mode="idle",cpu="1"} 312.4"#,
            &label_re(),
        );
        match decoded {
            Decoded::Sample { name, labels, .. } => {
                assert_eq!(name, "node_cpu_seconds_total");
                assert_eq!(labels.len(), 2);
                assert_eq!(labels["cpu"], "1");
                assert_eq!(labels["mode"], "idle");
            }
            other => panic!("expected a sample, got {other:?}"),
        }
    }

    #[test]
    fn last_closing_brace_delimits_the_label_block() {
        let decoded = decode(r#"weird{path="/a}b",q="x"} 1"#, &label_re());
        match decoded {
            Decoded::Sample { labels, .. } => {
                assert_eq!(labels["path"], "/a}b");
                assert_eq!(labels["q"], "x");
            }
            other => panic!("expected a sample, got {other:?}"),
        }
    }

    #[test]
    fn escaped_quote_does_not_terminate_a_label_value() {
        let decoded = decode(r#"m{msg="\"hi\""} 2"#, &label_re());
        match decoded {
            Decoded::Sample { labels, .. } => {
                assert_eq!(labels["msg"], r#"\"hi\""#);
            }
            other => panic!("expected a sample, got {other:?}"),
        }
    }

    #[test]
    fn special_float_tokens_parse() {
        for (token, check) in [
            ("+Inf", f64::is_infinite as fn(f64) -> bool),
            ("-Inf", f64::is_infinite),
            ("NaN", f64::is_nan),
        ] {
            match decode(&format!("m {token}"), &label_re()) {
                Decoded::Sample { value, .. } => assert!(check(value), "token {token}"),
                other => panic!("expected a sample for {token}, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_lines_skip_with_a_reason() {
        let re = label_re();
        assert_eq!(
            decode("bad_metric_no_value", &re),
            Decoded::Skip(SkipReason::BadShape)
        );
        // A trailing timestamp makes three tokens; the decoder only accepts two.
        assert_eq!(
            decode("m 1 1700000000", &re),
            Decoded::Skip(SkipReason::BadShape)
        );
        assert_eq!(
            decode(r#"m{cpu="0" 1"#, &re),
            Decoded::Skip(SkipReason::UnclosedLabels)
        );
        assert_eq!(
            decode("m}x{ 1", &re),
            Decoded::Skip(SkipReason::UnclosedLabels)
        );
        assert_eq!(decode("m not_a_number", &re), Decoded::Skip(SkipReason::BadValue));
    }

    #[test]
    fn parse_keeps_good_lines_and_counts_the_bad() {
        let parsed = parse("bad_metric_no_value\nnode_load1 0.42\n");
        assert_eq!(parsed.samples.len(), 1);
        assert_eq!(parsed.samples[0].name, "node_load1");
        assert_eq!(parsed.skipped, vec![SkipReason::BadShape]);
    }

    #[test]
    fn metadata_keeps_first_seen_help_while_samples_track_the_running_context() {
        let parsed = parse(
            "# HELP x first\n# TYPE x counter\nx 1\n# HELP x second\nx 2\n",
        );
        assert_eq!(parsed.metadata["x"].help, "first");
        assert_eq!(parsed.metadata["x"].metric_type, "counter");
        assert_eq!(parsed.samples.len(), 2);
        assert_eq!(parsed.samples[0].value, 1.0);
        assert_eq!(parsed.samples[0].help, "first");
        assert_eq!(parsed.samples[1].value, 2.0);
        assert_eq!(parsed.samples[1].help, "second");
    }

    #[test]
    fn running_context_applies_to_samples_of_any_name() {
        // The help/type context is not keyed per metric; a sample with no
        // header of its own inherits whatever header came last.
        let parsed = parse("# HELP a about a\na 1\nb 2\n");
        assert_eq!(parsed.samples[1].name, "b");
        assert_eq!(parsed.samples[1].help, "about a");
        assert_eq!(parsed.metadata["b"].help, "about a");
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "# HELP node_load1 1m load average.\n# TYPE node_load1 gauge\nnode_load1 0.42\njunk line here\n";
        assert_eq!(parse(text), parse(text));
    }

    #[test]
    fn decoded_sample_survives_reencoding() {
        let re = label_re();
        let line = r#"node_cpu_seconds_total{cpu="0",mode="idle"} 312.4"#;
        let Decoded::Sample { name, value, labels } = decode(line, &re) else {
            panic!("expected a sample");
        };
        let mut pairs: Vec<String> = labels
            .iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect();
        pairs.sort();
        let reencoded = format!("{name}{{{}}} {value}", pairs.join(","));
        let Decoded::Sample {
            name: name2,
            value: value2,
            labels: labels2,
        } = decode(&reencoded, &re)
        else {
            panic!("expected the re-encoded line to decode");
        };
        assert_eq!(name, name2);
        assert_eq!(value, value2);
        assert_eq!(labels, labels2);
    }
}
