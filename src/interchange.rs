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

//! Serde support for [`Snowflake`]s.
//!
//! Snowflakes are serialized as decimal *strings* rather than numbers. Many consumers (most notably JavaScript) store
//! numbers as doubles and would silently lose precision on values above 2^53. Deserialization accepts the same
//! decimal strings and rejects everything else, including native integers.
//!
//! Deserialized snowflakes aren't bound to a codec. Use [`Snowflake::bind`] before asking them for timestamps.
//!
//! ```
//! use epochflake::{Snowflake, DISCORD};
//!
//! let json = serde_json::to_string(&DISCORD.wrap(621611758141964298)).unwrap();
//! assert_eq!(r#""621611758141964298""#, json);
//! let snowflake: Snowflake = serde_json::from_str(&json).unwrap();
//! assert_eq!(1568274192129, snowflake.bind(&DISCORD).get_timestamp());
//! ```

use crate::{Error, Snowflake};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Formatter;

impl Serialize for Snowflake<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Snowflake<'_> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(DecimalVisitor)
    }
}

struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = Snowflake<'static>;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a snowflake as a decimal string")
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse::<u64>()
            .map(Snowflake::from_raw)
            .map_err(|e| E::custom(Error::InvalidSnowflake(e)))
    }
}

// End skip coverage
