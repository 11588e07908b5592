//! Classification results.

use serde::{Deserialize, Serialize};

use crate::predicates::{self, Parity};

/// A semantic tag attached to a classified number.
///
/// Serialized as lowercase strings: `"armstrong"`, `"even"`, `"odd"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    /// The number is an Armstrong number.
    Armstrong,
    /// The number is even.
    Even,
    /// The number is odd.
    Odd,
}

impl Property {
    /// Returns the lowercase tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Armstrong => "armstrong",
            Self::Even => "even",
            Self::Odd => "odd",
        }
    }
}

impl From<Parity> for Property {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::Even => Self::Even,
            Parity::Odd => Self::Odd,
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The computed mathematical properties of a single number.
///
/// `properties` holds `Armstrong` first when it applies, followed by
/// exactly one parity tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The classified number.
    pub number: i32,
    /// Whether the number is prime.
    pub is_prime: bool,
    /// Whether the number is perfect.
    pub is_perfect: bool,
    /// Whether the absolute value is an Armstrong number.
    pub is_armstrong: bool,
    /// Parity of the number.
    pub parity: Parity,
    /// Sum of the decimal digits of the absolute value.
    pub digit_sum: u32,
    /// Ordered semantic tags.
    pub properties: Vec<Property>,
}

impl Classification {
    /// Classifies `number`.
    pub fn of(number: i32) -> Self {
        let is_armstrong = predicates::is_armstrong(number);
        let parity = predicates::parity(number);

        let mut properties = Vec::with_capacity(2);
        if is_armstrong {
            properties.push(Property::Armstrong);
        }
        properties.push(parity.into());

        Self {
            number,
            is_prime: predicates::is_prime(number),
            is_perfect: predicates::is_perfect(number),
            is_armstrong,
            parity,
            digit_sum: predicates::digit_sum(number),
            properties,
        }
    }

    /// Attaches a fun fact, producing the response payload.
    #[must_use]
    pub fn with_fact(self, fun_fact: impl Into<String>) -> ClassificationResult {
        ClassificationResult {
            number: self.number,
            is_prime: self.is_prime,
            is_perfect: self.is_perfect,
            properties: self.properties,
            digit_sum: self.digit_sum,
            fun_fact: fun_fact.into(),
        }
    }
}

/// Successful classification response body.
///
/// ```
/// use numeris_core::Classification;
///
/// let result = Classification::of(28).with_fact("28 is the second perfect number.");
/// let json = serde_json::to_value(&result).unwrap();
///
/// assert_eq!(json["is_perfect"], true);
/// assert_eq!(json["properties"], serde_json::json!(["even"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The classified number.
    pub number: i32,
    /// Whether the number is prime.
    pub is_prime: bool,
    /// Whether the number is perfect.
    pub is_perfect: bool,
    /// Ordered semantic tags.
    pub properties: Vec<Property>,
    /// Sum of the decimal digits of the absolute value.
    pub digit_sum: u32,
    /// Trivia text, or the fallback text when no fact was available.
    pub fun_fact: String,
}
