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

//! The snowflake ID type and its field accessors.

use crate::codec::{
    self, Codec, Parts, INCREMENT_MASK, INCREMENT_MAX, PROCESS_ID_MASK, PROCESS_ID_MAX, PROCESS_ID_SHIFT,
    TIMESTAMP_MASK, TIMESTAMP_SHIFT, WORKER_ID_MASK, WORKER_ID_MAX, WORKER_ID_SHIFT,
};
use crate::{Error, Result};
use std::cmp;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::time::{Duration, SystemTime};

/// A snowflake ID.
///
/// A snowflake is a 64-bit integer holding the milliseconds since an epoch, a worker ID, a process ID, and an
/// increment. The epoch lives in a [`Codec`], which the snowflake borrows. Snowflakes created by a codec or generator
/// are *bound* to it and can report absolute timestamps. Snowflakes created from a bare integer or decoded from text
/// are *unbound*. Their fields can still be read, but timestamps need a codec (see [`bind`](Self::bind)).
///
/// Equality, ordering, and hashing only consider the raw integer. Two snowflakes with the same value compare equal
/// even if only one of them is bound to a codec.
///
/// # Example
///
/// ```
/// use epochflake::{Snowflake, DISCORD};
///
/// let snowflake: Snowflake = "999993323446079559".parse().unwrap();
/// assert!(snowflake.codec().is_none());
/// assert_eq!(2, snowflake.get_worker_id());
/// assert_eq!(1, snowflake.get_process_id());
/// assert_eq!(71, snowflake.get_increment());
///
/// let snowflake = snowflake.bind(&DISCORD);
/// assert_eq!(1658487387287, snowflake.get_timestamp());
/// assert_eq!("999993323446079559", snowflake.to_string());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Snowflake<'c> {
    inner: u64,
    codec: Option<&'c Codec>,
}

impl<'c> Snowflake<'c> {
    #[inline]
    pub(crate) const fn new(inner: u64, codec: Option<&'c Codec>) -> Self {
        Self { inner, codec }
    }

    /// Returns an unbound snowflake for the given integer representation.
    ///
    /// Use [`Codec::wrap`] instead if you know the snowflake's epoch.
    #[inline]
    pub const fn from_raw(input: u64) -> Self {
        Self::new(input, None)
    }

    /// Returns the integer representation of this snowflake.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.inner
    }

    /// Returns the codec this snowflake is bound to, if any.
    #[inline]
    pub const fn codec(&self) -> Option<&'c Codec> {
        self.codec
    }

    /// Returns this snowflake bound to another codec.
    ///
    /// The raw value doesn't change, so the snowflake's timestamp is reinterpreted relative to `codec`'s epoch.
    #[inline]
    pub const fn bind<'d>(self, codec: &'d Codec) -> Snowflake<'d> {
        Snowflake::new(self.inner, Some(codec))
    }

    /// Replaces the integer representation of this snowflake, keeping its codec.
    #[inline]
    pub fn set(&mut self, input: u64) -> &mut Self {
        self.inner = input;
        self
    }

    /// Returns the number of milliseconds since this snowflake's epoch.
    ///
    /// This doesn't need a codec. If you're looking for the absolute timestamp, use
    /// [`get_timestamp`](Self::get_timestamp) instead.
    #[inline]
    pub const fn get_timestamp_raw(&self) -> u64 {
        codec::elapsed(self.inner)
    }

    /// Returns the absolute timestamp of this snowflake in milliseconds since the Unix epoch.
    ///
    /// The addition of the epoch wraps around on overflow.
    ///
    /// # Panics
    ///
    /// Panics if the snowflake isn't bound to a codec. Use [`try_get_timestamp`](Self::try_get_timestamp) for
    /// snowflakes of unknown origin, e.g. ones decoded from text.
    #[inline]
    pub fn get_timestamp(&self) -> u64 {
        self.bound_codec().unpack_raw(self.inner).timestamp
    }

    /// Returns the absolute timestamp of this snowflake, or [`Error::UnboundCodec`] if it isn't bound to a codec.
    pub fn try_get_timestamp(&self) -> Result<u64> {
        let codec = self.codec.ok_or(Error::UnboundCodec)?;
        Ok(codec.unpack_raw(self.inner).timestamp)
    }

    /// Returns the timestamp of this snowflake's birth as a [`SystemTime`].
    ///
    /// Unlike [`get_timestamp`](Self::get_timestamp), this doesn't wrap. If the epoch plus the stored milliseconds
    /// overflow a `u64` or can't be represented as a `SystemTime`, this returns [`Error::TimestampOverflow`]. Unbound
    /// snowflakes return [`Error::UnboundCodec`].
    pub fn get_system_time(&self) -> Result<SystemTime> {
        let codec = self.codec.ok_or(Error::UnboundCodec)?;
        let millis = codec
            .epoch()
            .checked_add(self.get_timestamp_raw())
            .ok_or(Error::TimestampOverflow)?;
        SystemTime::UNIX_EPOCH
            .checked_add(Duration::from_millis(millis))
            .ok_or(Error::TimestampOverflow)
    }

    /// Returns the worker ID stored in this snowflake.
    #[inline]
    pub const fn get_worker_id(&self) -> u8 {
        codec::worker_id(self.inner)
    }

    /// Returns the process ID stored in this snowflake.
    #[inline]
    pub const fn get_process_id(&self) -> u8 {
        codec::process_id(self.inner)
    }

    /// Returns the increment stored in this snowflake.
    #[inline]
    pub const fn get_increment(&self) -> u16 {
        codec::increment(self.inner)
    }

    /// Decodes all fields of this snowflake using its codec.
    ///
    /// # Panics
    ///
    /// Panics if the snowflake isn't bound to a codec. Use [`try_parts`](Self::try_parts) or [`Codec::unpack`]
    /// instead if that's possible.
    #[inline]
    pub fn parts(&self) -> Parts {
        self.bound_codec().unpack_raw(self.inner)
    }

    /// Decodes all fields of this snowflake, or returns [`Error::UnboundCodec`] if it isn't bound to a codec.
    pub fn try_parts(&self) -> Result<Parts> {
        Ok(self.codec.ok_or(Error::UnboundCodec)?.unpack_raw(self.inner))
    }

    /// Sets the absolute timestamp (milliseconds since the Unix epoch), leaving the other fields untouched.
    ///
    /// The distance to the epoch is computed with wrapping subtraction and truncated to 42 bits.
    ///
    /// # Panics
    ///
    /// Panics if the snowflake isn't bound to a codec, as the epoch is needed to compute the stored offset.
    pub fn set_timestamp(&mut self, timestamp: u64) -> &mut Self {
        let epoch = self.bound_codec().epoch();
        self.set_timestamp_relative(timestamp, epoch)
    }

    /// Sets the absolute timestamp, or returns [`Error::UnboundCodec`] if the snowflake isn't bound to a codec.
    pub fn try_set_timestamp(&mut self, timestamp: u64) -> Result<&mut Self> {
        let epoch = self.codec.ok_or(Error::UnboundCodec)?.epoch();
        Ok(self.set_timestamp_relative(timestamp, epoch))
    }

    /// Sets the number of milliseconds since the epoch, leaving the other fields untouched.
    ///
    /// Only the low 42 bits of `elapsed` are stored. This doesn't need a codec.
    #[inline]
    pub fn set_timestamp_raw(&mut self, elapsed: u64) -> &mut Self {
        self.inner = (self.inner & !TIMESTAMP_MASK) | (elapsed << TIMESTAMP_SHIFT);
        self
    }

    /// Sets the worker ID, keeping only its low 5 bits.
    #[inline]
    pub fn set_worker_id(&mut self, worker_id: u8) -> &mut Self {
        self.inner = (self.inner & !WORKER_ID_MASK) | ((worker_id as u64 & WORKER_ID_MAX) << WORKER_ID_SHIFT);
        self
    }

    /// Sets the process ID, keeping only its low 5 bits.
    #[inline]
    pub fn set_process_id(&mut self, process_id: u8) -> &mut Self {
        self.inner = (self.inner & !PROCESS_ID_MASK) | ((process_id as u64 & PROCESS_ID_MAX) << PROCESS_ID_SHIFT);
        self
    }

    /// Sets the increment, keeping only its low 12 bits.
    #[inline]
    pub fn set_increment(&mut self, increment: u16) -> &mut Self {
        self.inner = (self.inner & !INCREMENT_MASK) | (increment as u64 & INCREMENT_MAX);
        self
    }

    fn set_timestamp_relative(&mut self, timestamp: u64, epoch: u64) -> &mut Self {
        self.set_timestamp_raw(timestamp.wrapping_sub(epoch))
    }

    fn bound_codec(&self) -> &'c Codec {
        match self.codec {
            Some(codec) => codec,
            None => panic!("snowflake {} isn't bound to a codec, so its epoch is unknown", self.inner),
        }
    }
}

impl Display for Snowflake<'_> {
    /// Displays the snowflake as a decimal-encoded integer.
    ///
    /// You can losslessly convert this method's output back into the same snowflake with [`str::parse`].
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl FromStr for Snowflake<'_> {
    type Err = Error;

    /// Parses a decimal-encoded snowflake.
    ///
    /// The result isn't bound to any codec. Input that isn't a decimal `u64` (including values above `u64::MAX`)
    /// returns [`Error::InvalidSnowflake`].
    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from_raw(s.parse()?))
    }
}

impl From<Snowflake<'_>> for u64 {
    #[inline]
    fn from(snowflake: Snowflake<'_>) -> Self {
        snowflake.inner
    }
}

impl PartialEq for Snowflake<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Snowflake<'_> {}

impl PartialOrd for Snowflake<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Snowflake<'_> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Hash for Snowflake<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

// End skip coverage
