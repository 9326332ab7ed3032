//! Dotted field paths into the draft's camelCase representation
//!
//! `guest.address.countryId`, `products.0.quantity`. Numeric segments index
//! sequences; every other segment names an object key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, FieldPathError> {
        if raw.is_empty() {
            return Err(FieldPathError::EmptyPath);
        }

        let segments = raw
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    Err(FieldPathError::EmptySegment {
                        path: raw.to_string(),
                    })
                } else if let Ok(index) = part.parse::<usize>() {
                    Ok(PathSegment::Index(index))
                } else {
                    Ok(PathSegment::Key(part.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Result<Self, FieldPathError> {
        if segments.is_empty() {
            return Err(FieldPathError::EmptyPath);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Last key segment, if the path ends in one
    pub fn leaf_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Path of the containing object
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn child(&self, key: &str) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self { segments }
    }

    /// True when `self` equals `scope` or lies underneath it
    pub fn is_within(&self, scope: &FieldPath) -> bool {
        self.segments.len() >= scope.segments.len()
            && self.segments[..scope.segments.len()] == scope.segments[..]
    }

    pub fn root_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = FieldPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = FieldPathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

/// Field path errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldPathError {
    #[error("Field path is empty")]
    EmptyPath,

    #[error("Field path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    #[error("Field '{segment}' does not exist at '{path}'")]
    UnknownField { path: String, segment: String },

    #[error("Index {index} is out of range at '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("Path '{path}' descends into a value that is not an object or sequence")]
    NotAContainer { path: String },

    #[error("Value for '{path}' has the wrong type: {message}")]
    TypeMismatch { path: String, message: String },

    #[error("Draft could not be serialized: {message}")]
    Serialization { message: String },
}

impl FieldPathError {
    pub fn type_mismatch(path: &FieldPath, message: &str) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::Serialization { .. } => crate::logging::codes::system::INTERNAL_ERROR,
            _ => crate::logging::codes::wizard::INVALID_FIELD_PATH,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::EmptyPath | Self::EmptySegment { .. } => "MalformedPath",
            Self::UnknownField { .. } => "UnknownField",
            Self::IndexOutOfRange { .. } => "IndexOutOfRange",
            Self::NotAContainer { .. } => "NotAContainer",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::Serialization { .. } => "Serialization",
        }
    }
}

/// Read the value at `path`; a `null` container yields `None` for everything beneath it
pub fn get<'a>(root: &'a Value, path: &FieldPath) -> Result<Option<&'a Value>, FieldPathError> {
    let mut node = root;
    let mut walked: Vec<String> = Vec::new();

    for segment in path.segments() {
        let location = walked.join(".");
        node = match (node, segment) {
            (Value::Null, _) => return Ok(None),
            (Value::Object(map), PathSegment::Key(key)) => {
                map.get(key).ok_or_else(|| FieldPathError::UnknownField {
                    path: location,
                    segment: key.clone(),
                })?
            }
            (Value::Array(items), PathSegment::Index(index)) => {
                items
                    .get(*index)
                    .ok_or_else(|| FieldPathError::IndexOutOfRange {
                        path: location,
                        index: *index,
                        len: items.len(),
                    })?
            }
            _ => return Err(FieldPathError::NotAContainer { path: location }),
        };
        walked.push(segment.to_string());
    }

    Ok(Some(node))
}

/// Check that every key of a written record survived deserialization.
///
/// `written` is the value handed to `set`; `stored` is the same location read
/// back from the re-serialized draft.
pub fn ensure_retained(written: &Value, stored: &Value, path: &FieldPath) -> Result<(), FieldPathError> {
    retained_at(written, stored, &path.to_string())
}

fn retained_at(written: &Value, stored: &Value, location: &str) -> Result<(), FieldPathError> {
    match (written, stored) {
        (Value::Object(written), Value::Object(stored)) => {
            for (key, value) in written {
                let kept = stored.get(key).ok_or_else(|| FieldPathError::UnknownField {
                    path: location.to_string(),
                    segment: key.clone(),
                })?;
                retained_at(value, kept, &format!("{}.{}", location, key))?;
            }
            Ok(())
        }
        (Value::Array(written), Value::Array(stored)) => {
            for (index, (value, kept)) in written.iter().zip(stored).enumerate() {
                retained_at(value, kept, &format!("{}.{}", location, index))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Replace the value at `path`, returning the previous value.
///
/// Intermediate `null` objects are materialised as empty objects so that an
/// absent optional record can be filled field by field.
pub fn set(root: &mut Value, path: &FieldPath, value: Value) -> Result<Value, FieldPathError> {
    let segments = path.segments();
    let (last, parents) = segments.split_last().ok_or(FieldPathError::EmptyPath)?;

    let mut node = root;
    let mut walked: Vec<String> = Vec::new();

    for segment in parents {
        let location = walked.join(".");
        if node.is_null() {
            *node = Value::Object(Map::new());
        }
        node = match (node, segment) {
            (Value::Object(map), PathSegment::Key(key)) => {
                map.get_mut(key).ok_or_else(|| FieldPathError::UnknownField {
                    path: location,
                    segment: key.clone(),
                })?
            }
            (Value::Array(items), PathSegment::Index(index)) => {
                let len = items.len();
                items
                    .get_mut(*index)
                    .ok_or(FieldPathError::IndexOutOfRange {
                        path: location,
                        index: *index,
                        len,
                    })?
            }
            _ => return Err(FieldPathError::NotAContainer { path: location }),
        };
        walked.push(segment.to_string());
    }

    let location = walked.join(".");
    if node.is_null() {
        *node = Value::Object(Map::new());
    }
    match (node, last) {
        // A freshly materialised object has no keys yet; missing fields are
        // filled with defaults when the draft is read back.
        (Value::Object(map), PathSegment::Key(key)) if map.is_empty() => {
            map.insert(key.clone(), value);
            Ok(Value::Null)
        }
        (Value::Object(map), PathSegment::Key(key)) => match map.get_mut(key) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(FieldPathError::UnknownField {
                path: location,
                segment: key.clone(),
            }),
        },
        (Value::Array(items), PathSegment::Index(index)) => {
            let len = items.len();
            match items.get_mut(*index) {
                Some(slot) => Ok(std::mem::replace(slot, value)),
                None => Err(FieldPathError::IndexOutOfRange {
                    path: location,
                    index: *index,
                    len,
                }),
            }
        }
        _ => Err(FieldPathError::NotAContainer { path: location }),
    }
}
