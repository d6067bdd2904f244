use crate::convert::EntityKind;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unexpected state shape for {0}")]
    UnexpectedShape(&'static str),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid field: {0}")]
    InvalidField(&'static str),
    #[error("invalid address: {0}")]
    Address(#[from] lodestone_core::AddressError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The converter variant was invoked with parameters it does not
    /// support. This is a defect at the call site and is never retried.
    #[error("conversion not supported for {kind:?} with the given parameters")]
    UnsupportedOperation { kind: EntityKind },
    #[error(transparent)]
    Model(#[from] ModelError),
}
