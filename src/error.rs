/*
 * Copyright © 2023 Archer <archer@nefarious.dev>
 * Licensed under the Apache License, Version 2.0 (the "Licence");
 * you may not use this file except in compliance with the Licence.
 * You may obtain a copy of the Licence at
 *     https://www.apache.org/licenses/LICENSE-2.0
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the Licence is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the Licence for the specific language governing permissions and
 * limitations under the Licence.
 */

//! The error type shared by the whole crate.

use std::fmt::{Display, Formatter};
use std::num::ParseIntError;

/// Errors that can occur when decoding or using a [`Snowflake`](crate::Snowflake).
///
/// Note that generating snowflakes never fails, so none of these variants are returned by a
/// [`Generator`](crate::Generator).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An error that occurs if a textual snowflake isn't a decimal unsigned 64-bit integer.
    ///
    /// This is returned when parsing snowflakes with [`str::parse`] and (with the `serde` feature) when deserializing
    /// them. The wrapped error describes why the input was rejected, e.g. because it contains non-digit characters or
    /// exceeds `u64::MAX`.
    InvalidSnowflake(ParseIntError),
    /// An error that occurs if an absolute timestamp is requested from a snowflake that isn't bound to a
    /// [`Codec`](crate::Codec).
    ///
    /// Snowflakes decoded from text don't know their epoch. Use [`Snowflake::bind`](crate::Snowflake::bind) to attach
    /// one before asking for timestamps.
    UnboundCodec,
    /// An error that occurs if the process-wide default generator is initialized more than once.
    AlreadyInitialized,
    /// An error that occurs if a timestamp can't be represented as a [`SystemTime`](std::time::SystemTime).
    TimestampOverflow,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidSnowflake(e) => {
                write!(f, "the input is not a decimal snowflake: {e}")
            }
            Error::UnboundCodec => {
                write!(f, "the snowflake isn't bound to a codec, so its epoch is unknown")
            }
            Error::AlreadyInitialized => {
                write!(f, "the default snowflake generator was already initialized")
            }
            Error::TimestampOverflow => {
                write!(f, "the timestamp can't be represented by the underlying data structure")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidSnowflake(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Self {
        Error::InvalidSnowflake(e)
    }
}

/// The primary result type of this crate.
pub type Result<T> = std::result::Result<T, Error>;

// End skip coverage
