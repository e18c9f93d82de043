use std::{collections::BTreeMap, io};

use derive_more::{Deref, Display, From};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::error::GeneratorFault;

/// One generator parameter value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Floats(Vec<OrderedFloat<f64>>),
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float(OrderedFloat(v))
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<Vec<f64>> for Param {
    fn from(v: Vec<f64>) -> Self {
        Param::Floats(v.into_iter().map(OrderedFloat).collect())
    }
}

impl Param {
    /// Canonical JSON for this value alone, as used in results-log cells.
    pub fn to_json(&self) -> String {
        canonical_json(self)
    }
}

/// Generator parameters, keyed by name. Equal content means equal config,
/// whatever order the entries were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(BTreeMap<String, Param>);

/// Hex MD5 of a config's canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display, From)]
pub struct Signature(String);

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Param>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Param>) {
        self.0.insert(name.to_string(), value.into());
    }

    fn param(&self, name: &str) -> Result<&Param, GeneratorFault> {
        self.0.get(name).ok_or_else(|| GeneratorFault::MissingParam(name.to_string()))
    }

    pub fn float(&self, name: &str) -> Result<f64, GeneratorFault> {
        match self.param(name)? {
            Param::Float(v) => Ok(v.0),
            Param::Int(v) => Ok(*v as f64),
            _ => Err(GeneratorFault::ParamType { name: name.to_string(), expected: "number" }),
        }
    }

    pub fn float_or(&self, name: &str, default: f64) -> Result<f64, GeneratorFault> {
        if self.contains_key(name) {
            self.float(name)
        } else {
            Ok(default)
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool, GeneratorFault> {
        match self.param(name)? {
            Param::Bool(v) => Ok(*v),
            _ => Err(GeneratorFault::ParamType { name: name.to_string(), expected: "bool" }),
        }
    }

    pub fn floats(&self, name: &str) -> Result<Vec<f64>, GeneratorFault> {
        match self.param(name)? {
            Param::Floats(vs) => Ok(vs.iter().map(|v| v.0).collect()),
            _ => Err(GeneratorFault::ParamType { name: name.to_string(), expected: "list of numbers" }),
        }
    }

    pub fn floats_or(&self, name: &str, default: &[f64]) -> Result<Vec<f64>, GeneratorFault> {
        if self.contains_key(name) {
            self.floats(name)
        } else {
            Ok(default.to_vec())
        }
    }

    /// Keys sorted, `", "`/`": "` separators, floats in their shortest
    /// round-trip form (`0.7`, `185.0`, `1e-07`, `1e+16`).
    pub fn canonical_json(&self) -> String {
        canonical_json(self)
    }

    pub fn signature(&self) -> Signature {
        Signature(format!("{:x}", md5::compute(self.canonical_json().as_bytes())))
    }
}

impl FromIterator<(String, Param)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, Param)>>(iter: I) -> Self {
        Config(iter.into_iter().collect())
    }
}

fn canonical_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter);
    // Serializing maps of strings and numbers into memory can't fail.
    if value.serialize(&mut ser).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(float_repr(value).as_bytes())
    }
}

/// Shortest round-trip rendering: positional for decimal exponents in
/// `-4..16` (always with a fractional part), scientific with a signed,
/// two-digit-minimum exponent otherwise.
pub fn float_repr(value: f64) -> String {
    let sci = format!("{:e}", value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    if !(-4..16).contains(&exp) {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exp.abs());
    }
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exp + 1;
    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    };
    format!("{}{}", sign, body)
}
