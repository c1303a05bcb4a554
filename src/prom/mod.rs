mod model;
pub use self::model::MetricMeta;
pub use self::model::MetricSample;
pub use self::model::SkipReason;

pub(crate) mod parser;
pub use self::parser::parse;
pub use self::parser::Parsed;

mod index;
pub use self::index::MetricDetails;
pub use self::index::MetricIndex;
pub use self::index::SearchHit;

mod metric_scraper;
pub use self::metric_scraper::MetricScraper;

#[cfg(test)]
mod test_data;
