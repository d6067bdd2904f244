use serde_json::{Map, Value};

/// A fetched state value, decoded into one of the shapes the converters
/// understand.
///
/// The node already returns self-describing values; the only shapes with
/// meaning for indexing are field mappings (current-layout records), ordered
/// lists (legacy and positional records), and absence.
#[derive(Debug, Clone, PartialEq)]
pub enum RawState {
    Dictionary(Map<String, Value>),
    List(Vec<Value>),
    Absent,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported state shape: {0}")]
    UnsupportedShape(&'static str),
}

impl RawState {
    /// Decode an optional wire value into a raw state.
    ///
    /// A missing or null value is a legitimate `Absent` state; any shape
    /// other than an object or an array fails decoding for this entity only.
    pub fn decode(value: Option<Value>) -> Result<Self, DecodeError> {
        match value {
            None | Some(Value::Null) => Ok(RawState::Absent),
            Some(Value::Object(fields)) => Ok(RawState::Dictionary(fields)),
            Some(Value::Array(items)) => Ok(RawState::List(items)),
            Some(Value::String(_)) => Err(DecodeError::UnsupportedShape("string")),
            Some(Value::Number(_)) => Err(DecodeError::UnsupportedShape("number")),
            Some(Value::Bool(_)) => Err(DecodeError::UnsupportedShape("boolean")),
        }
    }

    pub fn as_dictionary(&self) -> Option<&Map<String, Value>> {
        match self {
            RawState::Dictionary(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            RawState::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RawState::Absent)
    }
}
