//! Identifier parsing and Relay-style global ids
//!
//! A global id is the base64 encoding of `"<TypeName>:<id>"`, for example
//! `VXNlcjox` for `User:1`. The type tag selects the `Node` variant.

use async_graphql::ID;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ApiError;
use crate::models::EntityKey;

const USER_TYPE: &str = "User";
const POST_TYPE: &str = "Post";

/// Parse a plain integer id argument
pub fn parse_id(id: &ID) -> Result<i32, ApiError> {
    id.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::ValidationError(format!("invalid id: {:?}", id.as_str())))
}

/// Encode a row identity as an opaque global id
pub fn encode_global_id(key: EntityKey) -> ID {
    let type_name = match key {
        EntityKey::User(_) => USER_TYPE,
        EntityKey::Post(_) => POST_TYPE,
    };
    ID(STANDARD.encode(format!("{}:{}", type_name, key.id())))
}

/// Decode a global id back into the row identity it names
pub fn decode_global_id(id: &ID) -> Result<EntityKey, ApiError> {
    let invalid = || ApiError::ValidationError(format!("invalid global id: {:?}", id.as_str()));

    let bytes = STANDARD.decode(id.as_bytes()).map_err(|_| invalid())?;
    let decoded = String::from_utf8(bytes).map_err(|_| invalid())?;
    let (type_name, raw_id) = decoded.split_once(':').ok_or_else(invalid)?;
    let row_id = raw_id.parse::<i32>().map_err(|_| invalid())?;

    match type_name {
        USER_TYPE => Ok(EntityKey::User(row_id)),
        POST_TYPE => Ok(EntityKey::Post(row_id)),
        _ => Err(invalid()),
    }
}
