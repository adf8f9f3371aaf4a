use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LabelsError;

/// Flat `key -> value` tags attached to a [`crate::Field`].
///
/// Keys are kept sorted, so the rendered form `k1=v1, k2=v2` is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether the `k1=v1, k2=v2` rendering parses back to exactly these labels.
    ///
    /// Fails for empty keys, keys containing `=`, keys or values containing
    /// `", "`, and renderings wrapped in `{}`.
    pub fn is_encodable(&self) -> bool {
        self.to_string().parse::<Labels>().as_ref() == Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for Labels {
    type Err = LabelsError;

    /// Parses the `k1=v1, k2=v2` form. Surrounding braces are tolerated and an
    /// empty string is the empty label set. Keys and values are taken verbatim,
    /// whitespace included.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(s);

        let mut labels = Labels::new();
        if s.is_empty() {
            return Ok(labels);
        }

        for pair in s.split(", ") {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| LabelsError::MissingSeparator(pair.to_string()))?;
            if key.is_empty() {
                return Err(LabelsError::EmptyKey(pair.to_string()));
            }
            labels.insert(key, value);
        }

        Ok(labels)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Labels(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Labels {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sorted_by_key() {
        let labels = Labels::from([("zone", "b"), ("host", "a")]);
        assert_eq!(labels.to_string(), "host=a, zone=b");
        assert_eq!(Labels::new().to_string(), "");
    }

    #[test]
    fn parses_rendered_form() {
        let labels: Labels = "host=a, zone=b".parse().unwrap();
        assert_eq!(labels, Labels::from([("host", "a"), ("zone", "b")]));

        let braced: Labels = "{host=a}".parse().unwrap();
        assert_eq!(braced.get("host"), Some("a"));

        assert!("".parse::<Labels>().unwrap().is_empty());
    }

    #[test]
    fn whitespace_in_keys_and_values_is_kept() {
        let labels = Labels::from([("k", " padded "), (" lead", "x")]);
        assert_eq!(labels.to_string().parse::<Labels>(), Ok(labels));
    }

    #[test]
    fn separators_inside_labels_are_not_encodable() {
        assert!(Labels::new().is_encodable());
        assert!(Labels::from([("path", "/a=b")]).is_encodable());
        assert!(!Labels::from([("path", "/a, /b")]).is_encodable());
        assert!(!Labels::from([("a=b", "c")]).is_encodable());
        assert!(!Labels::from([("", "c")]).is_encodable());
        assert!(!Labels::from([("{a", "b}")]).is_encodable());
    }

    #[test]
    fn value_may_contain_equals() {
        let labels: Labels = "query=a=b".parse().unwrap();
        assert_eq!(labels.get("query"), Some("a=b"));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert_eq!(
            "host".parse::<Labels>(),
            Err(LabelsError::MissingSeparator("host".to_string()))
        );
        assert_eq!(
            "=a".parse::<Labels>(),
            Err(LabelsError::EmptyKey("=a".to_string()))
        );
    }
}
