//! The classification service behind `/api/classify-number`.

use numeris_core::{validate, Classification, ClassificationResult, ValidationError};
use numeris_facts::FactFetcher;
use numeris_telemetry::metrics::{record_fact_lookup, record_validation_failure};
use tracing::debug;

/// Name of the query parameter carrying the input.
pub const NUMBER_PARAM: &str = "number";

/// Validates, classifies, and attaches a fun fact.
///
/// # Example
///
/// ```rust
/// use numeris_facts::FactFetcher;
/// use numeris_server::NumberClassifier;
///
/// # tokio_test::block_on(async {
/// let classifier = NumberClassifier::new(FactFetcher::disabled());
///
/// let result = classifier.classify(Some("28")).await.unwrap();
/// assert!(result.is_perfect);
/// assert_eq!(result.fun_fact, "No fact available");
///
/// let err = classifier.classify(Some("abc")).await.unwrap_err();
/// assert_eq!(err.echoed_input(), "abc");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct NumberClassifier {
    fetcher: FactFetcher,
}

impl NumberClassifier {
    /// Creates a classifier that looks facts up through `fetcher`.
    pub fn new(fetcher: FactFetcher) -> Self {
        Self { fetcher }
    }

    /// Returns the fact fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &FactFetcher {
        &self.fetcher
    }

    /// Classifies the raw `number` input.
    ///
    /// A fact lookup failure never fails the call; the fallback text is
    /// used instead.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for missing or non-integer input.
    /// No fact lookup happens in that case.
    pub async fn classify(&self, raw: Option<&str>) -> Result<ClassificationResult, ValidationError> {
        let number = validate(raw).map_err(|e| {
            debug!(reason = e.reason(), input = e.echoed_input(), "rejected input");
            record_validation_failure(e.reason());
            e
        })?;

        let classification = Classification::of(number);
        let fact = self.fetcher.lookup(number).await;
        record_fact_lookup(fact.outcome());

        Ok(classification.with_fact(fact.into_text()))
    }
}

/// Extracts the `number` parameter from a raw query string.
///
/// The query is decoded as `application/x-www-form-urlencoded`. The first
/// occurrence wins, other parameters are ignored, and a bare `number`
/// without `=` yields an empty value.
///
/// ```rust
/// use numeris_server::number_param;
///
/// assert_eq!(number_param(Some("number=42&x=1")).as_deref(), Some("42"));
/// assert_eq!(number_param(Some("number=+7")).as_deref(), Some(" 7"));
/// assert_eq!(number_param(Some("other=1")), None);
/// assert_eq!(number_param(None), None);
/// ```
pub fn number_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
        Ok(pairs) => pairs
            .into_iter()
            .find(|(key, _)| key == NUMBER_PARAM)
            .map(|(_, value)| value),
        Err(e) => {
            debug!(error = %e, "undecodable query string");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use numeris_core::{Property, FALLBACK_FACT};
    use numeris_facts::fixtures::{FailingFactSource, SlowFactSource, StaticFactSource};

    #[tokio::test]
    async fn test_classify_with_fetched_fact() {
        let source = Arc::new(StaticFactSource::new("153 is narcissistic."));
        let classifier =
            NumberClassifier::new(FactFetcher::new(source.clone(), Duration::from_secs(1)));

        let result = classifier.classify(Some("153")).await.unwrap();
        assert_eq!(result.number, 153);
        assert!(!result.is_prime);
        assert!(!result.is_perfect);
        assert_eq!(result.properties, vec![Property::Armstrong, Property::Odd]);
        assert_eq!(result.digit_sum, 9);
        assert_eq!(result.fun_fact, "153 is narcissistic.");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_classify_falls_back_on_failure() {
        let source = Arc::new(FailingFactSource::new());
        let classifier =
            NumberClassifier::new(FactFetcher::new(source.clone(), Duration::from_secs(1)));

        let result = classifier.classify(Some("-4")).await.unwrap();
        assert_eq!(result.properties, vec![Property::Even]);
        assert_eq!(result.fun_fact, FALLBACK_FACT);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_classify_falls_back_on_timeout() {
        let source = Arc::new(SlowFactSource::new(Duration::from_secs(10), "late"));
        let classifier =
            NumberClassifier::new(FactFetcher::new(source, Duration::from_millis(100)));

        let result = classifier.classify(Some("7")).await.unwrap();
        assert!(result.is_prime);
        assert_eq!(result.fun_fact, FALLBACK_FACT);
    }

    #[tokio::test]
    async fn test_invalid_input_skips_lookup() {
        let source = Arc::new(StaticFactSource::new("unused"));
        let classifier =
            NumberClassifier::new(FactFetcher::new(source.clone(), Duration::from_secs(1)));

        assert_eq!(
            classifier.classify(None).await,
            Err(ValidationError::Missing)
        );
        assert_eq!(
            classifier.classify(Some("  ")).await,
            Err(ValidationError::Missing)
        );
        assert_eq!(
            classifier.classify(Some("abc")).await,
            Err(ValidationError::not_integer("abc"))
        );
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_number_param_first_wins() {
        assert_eq!(
            number_param(Some("number=1&number=2")).as_deref(),
            Some("1")
        );
    }

    #[test]
    fn test_number_param_decoding() {
        assert_eq!(number_param(Some("number=%2D12")).as_deref(), Some("-12"));
        assert_eq!(number_param(Some("number=1+2")).as_deref(), Some("1 2"));
        assert_eq!(number_param(Some("number=%20%2042")).as_deref(), Some("  42"));
    }

    #[test]
    fn test_number_param_blank_forms() {
        assert_eq!(number_param(Some("number")).as_deref(), Some(""));
        assert_eq!(number_param(Some("number=")).as_deref(), Some(""));
        assert_eq!(number_param(Some("")), None);
    }
}
