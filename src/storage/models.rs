use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the group whose requests are listed without a header.
pub const UNSORTED_NAME: &str = "unsorted";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestData {
    pub url: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub method: String,
    pub proto: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Box<RequestData>>,
}

impl RequestData {
    pub fn method_or_default(&self) -> &str {
        if self.method.trim().is_empty() {
            "GET"
        } else {
            self.method.as_str()
        }
    }

    /// Headers as `Key: Value` lines, one per value.
    pub fn header_lines(&self) -> Vec<String> {
        self.headers
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| format!("{}: {}", key, v)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RequestData>,
}

impl Request {
    pub fn response(&self) -> Option<&RequestData> {
        self.data.as_ref().and_then(|d| d.response.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Group {
    #[cfg(test)]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn is_unsorted(&self) -> bool {
        self.name.eq_ignore_ascii_case(UNSORTED_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_deserialize_yaml() {
        let yaml = r#"
name: users
desc: User endpoints
requests:
  - name: list users
    data:
      url: https://api.example.com/users
      method: GET
      headers:
        Accept: [application/json]
      response:
        proto: HTTP/1.1
        body: '[]'
  - name: empty
"#;
        let group: Group = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(group.name, "users");
        assert_eq!(group.requests.len(), 2);
        let first = &group.requests[0];
        assert_eq!(first.data.as_ref().unwrap().url, "https://api.example.com/users");
        assert_eq!(first.response().unwrap().body, "[]");
        assert!(group.requests[1].data.is_none());
    }

    #[test]
    fn test_method_defaults_to_get() {
        let data = RequestData::default();
        assert_eq!(data.method_or_default(), "GET");
        let data = RequestData {
            method: "POST".into(),
            ..RequestData::default()
        };
        assert_eq!(data.method_or_default(), "POST");
    }

    #[test]
    fn test_header_lines_expand_multiple_values() {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), vec!["a/b".to_string(), "c/d".to_string()]);
        headers.insert("X-Id".to_string(), vec!["1".to_string()]);
        let data = RequestData {
            headers,
            ..RequestData::default()
        };
        assert_eq!(
            data.header_lines(),
            vec!["Accept: a/b", "Accept: c/d", "X-Id: 1"]
        );
    }

    #[test]
    fn test_unsorted_is_case_insensitive() {
        assert!(Group::new("Unsorted").is_unsorted());
        assert!(!Group::new("users").is_unsorted());
    }
}
