use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Reference to a product in the event: `module[:instance[:process]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InputTag {
    module: String,
    instance: String,
    process: String,
}

impl InputTag {
    pub fn new(module: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            instance: instance.into(),
            process: String::new(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn process(&self) -> &str {
        &self.process
    }

    fn to_python(&self) -> String {
        let mut parts = vec![&self.module];
        if !self.instance.is_empty() || !self.process.is_empty() {
            parts.push(&self.instance);
        }
        if !self.process.is_empty() {
            parts.push(&self.process);
        }
        let quoted: Vec<String> = parts.iter().map(|p| format!("\"{p}\"")).collect();
        format!("cms.InputTag({})", quoted.join(","))
    }
}

impl FromStr for InputTag {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 || parts[0].trim().is_empty() {
            return Err(ModelError::InvalidInputTag(s.to_string()));
        }
        Ok(Self {
            module: parts[0].to_string(),
            instance: parts.get(1).copied().unwrap_or_default().to_string(),
            process: parts.get(2).copied().unwrap_or_default().to_string(),
        })
    }
}

impl fmt::Display for InputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module)?;
        if !self.instance.is_empty() || !self.process.is_empty() {
            write!(f, ":{}", self.instance)?;
        }
        if !self.process.is_empty() {
            write!(f, ":{}", self.process)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for InputTag {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InputTag> for String {
    fn from(tag: InputTag) -> Self {
        tag.to_string()
    }
}

/// Typed parameter value of a module declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum ParamValue {
    Bool(bool),
    Int32(i32),
    String(String),
    InputTag(InputTag),
    VString(Vec<String>),
}

impl ParamValue {
    /// Full declaration form, e.g. `cms.bool(True)`.
    pub fn to_python(&self) -> String {
        match self {
            ParamValue::Bool(b) => format!("cms.bool({})", py_bool(*b)),
            ParamValue::Int32(n) => format!("cms.int32({n})"),
            ParamValue::String(s) => format!("cms.string(\"{s}\")"),
            ParamValue::InputTag(tag) => tag.to_python(),
            ParamValue::VString(items) => format!("cms.vstring({})", py_list(items)),
        }
    }

    /// Short form accepted when modifying an existing parameter.
    pub fn to_modifier_literal(&self) -> String {
        match self {
            ParamValue::Bool(b) => py_bool(*b).to_string(),
            ParamValue::Int32(n) => n.to_string(),
            ParamValue::String(s) => format!("\"{s}\""),
            ParamValue::InputTag(tag) => format!("\"{tag}\""),
            ParamValue::VString(items) => format!("[{}]", py_list(items)),
        }
    }
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

fn py_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered parameter set; assigning an existing name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(Vec<(String, ParamValue)>);

impl ParameterSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert or overwrite a parameter. Returns `self` for chaining.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) -> &mut Self {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Apply every entry of `other` on top of `self`.
    pub fn overlay(&mut self, other: &ParameterSet) {
        for (name, value) in other.iter() {
            self.set(name, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_tag_parses_all_forms() {
        let tag: InputTag = "mix:g4SimHitsMuonCSCHits".parse().unwrap();
        assert_eq!(tag.module(), "mix");
        assert_eq!(tag.instance(), "g4SimHitsMuonCSCHits");
        assert_eq!(tag.process(), "");

        let tag: InputTag = "generalTracks".parse().unwrap();
        assert_eq!(tag.to_string(), "generalTracks");

        let tag: InputTag = "a::HLT".parse().unwrap();
        assert_eq!(tag.to_string(), "a::HLT");
    }

    #[test]
    fn input_tag_rejects_bad_input() {
        for bad in ["", ":x", "a:b:c:d"] {
            assert!(bad.parse::<InputTag>().is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn python_forms() {
        let tag = InputTag::new("mix", "g4SimHitsMuonCSCHits");
        assert_eq!(
            ParamValue::InputTag(tag.clone()).to_python(),
            r#"cms.InputTag("mix","g4SimHitsMuonCSCHits")"#
        );
        assert_eq!(
            ParamValue::InputTag(tag).to_modifier_literal(),
            r#""mix:g4SimHitsMuonCSCHits""#
        );
        assert_eq!(ParamValue::Bool(true).to_python(), "cms.bool(True)");
        assert_eq!(ParamValue::Int32(-1).to_python(), "cms.int32(-1)");
        assert_eq!(
            ParamValue::VString(vec!["a".into(), "b".into()]).to_python(),
            "cms.vstring('a', 'b')"
        );
    }

    #[test]
    fn set_replaces_in_place() {
        let mut pset = ParameterSet::new();
        pset.set("a", ParamValue::Bool(true))
            .set("b", ParamValue::Int32(1))
            .set("a", ParamValue::Bool(false));

        let names: Vec<_> = pset.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(pset.get("a"), Some(&ParamValue::Bool(false)));
    }

    #[test]
    fn input_tag_serializes_as_string() {
        let json = serde_json::to_string(&InputTag::new("mix", "x")).unwrap();
        assert_eq!(json, r#""mix:x""#);
    }
}
