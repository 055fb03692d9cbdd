// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Decoders for properties some services encode off-schema.
//!
//! Use with `#[serde(default, deserialize_with = "...")]`.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Deserializer, Error};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Optional number that may arrive as a JSON string (`"3600"`).
///
/// The string form is accepted and logged as a warning. Empty strings and
/// `null` decode to `None`. Anything else is an error.
pub fn number_or_string<'de, D, N>(deserializer: D) -> Result<Option<N>, D::Error>
where
    D: Deserializer<'de>,
    N: FromStr + DeserializeOwned,
    N::Err: Display,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                warn!("Numeric property sent as empty string, treating as absent");
                return Ok(None);
            }
            let parsed = trimmed
                .parse::<N>()
                .map_err(|e| D::Error::custom(format!("invalid numeric string {:?}: {}", s, e)))?;
            warn!(value = %s, "Numeric property sent as string");
            Ok(Some(parsed))
        }
        number @ Value::Number(_) => N::deserialize(number).map(Some).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected number or numeric string, got {}",
            other
        ))),
    }
}

/// Optional boolean that may arrive as `"true"`/`"false"` or `"Yes"`/`"No"`.
pub fn bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        Value::String(s) => {
            let parsed = match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" => true,
                "false" | "no" => false,
                _ => return Err(D::Error::custom(format!("invalid boolean string {:?}", s))),
            };
            warn!(value = %s, "Boolean property sent as string");
            Ok(Some(parsed))
        }
        other => Err(D::Error::custom(format!(
            "expected boolean or boolean string, got {}",
            other
        ))),
    }
}
