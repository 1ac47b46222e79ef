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

//! The epoch-relative bit layout of a [`Snowflake`].

use crate::clock::{Clock, SystemClock};
use crate::{Generator, Snowflake};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of bits holding the milliseconds since the epoch.
pub const TIMESTAMP_BITS: u32 = 42;
/// The number of bits holding the worker ID.
pub const WORKER_ID_BITS: u32 = 5;
/// The number of bits holding the process ID.
pub const PROCESS_ID_BITS: u32 = 5;
/// The number of bits holding the increment.
pub const INCREMENT_BITS: u32 = 12;

pub(crate) const PROCESS_ID_SHIFT: u32 = INCREMENT_BITS;
pub(crate) const WORKER_ID_SHIFT: u32 = PROCESS_ID_SHIFT + PROCESS_ID_BITS;
pub(crate) const TIMESTAMP_SHIFT: u32 = WORKER_ID_SHIFT + WORKER_ID_BITS;

/// Field masks *before* shifting a value into place.
pub(crate) const WORKER_ID_MAX: u64 = (1 << WORKER_ID_BITS) - 1;
pub(crate) const PROCESS_ID_MAX: u64 = (1 << PROCESS_ID_BITS) - 1;
pub(crate) const INCREMENT_MAX: u64 = (1 << INCREMENT_BITS) - 1;

pub(crate) const TIMESTAMP_MASK: u64 = !((1 << TIMESTAMP_SHIFT) - 1);
pub(crate) const WORKER_ID_MASK: u64 = WORKER_ID_MAX << WORKER_ID_SHIFT;
pub(crate) const PROCESS_ID_MASK: u64 = PROCESS_ID_MAX << PROCESS_ID_SHIFT;
pub(crate) const INCREMENT_MASK: u64 = INCREMENT_MAX;

/// A trait that defines a compile-time epoch.
///
/// Most code builds its [`Codec`] from a plain integer with [`Codec::new`]. If your application prefers to carry the
/// epoch as a type (e.g. to share it between crates), implement this trait and use [`Codec::from_epoch`].
///
/// # Example
///
/// ```
/// use epochflake::{Codec, Epoch};
///
/// struct MyEpoch;
///
/// impl Epoch for MyEpoch {
///     fn millis_since_unix() -> u64 {
///         // Return the first millisecond of 2015 (UTC)
///         1420070400000
///     }
/// }
///
/// assert_eq!(1420070400000, Codec::from_epoch::<MyEpoch>().epoch());
/// ```
pub trait Epoch {
    /// Returns the number of milliseconds since the Unix epoch.
    ///
    /// The returned epoch must remain constant throughout the application's runtime.
    fn millis_since_unix() -> u64;
}

/// The decoded view of a [`Snowflake`].
///
/// Unlike the snowflake itself, the timestamp in this structure is absolute (milliseconds since the Unix epoch), so
/// the same parts can be packed with codecs using different epochs.
///
/// The field types are wider than the bits reserved for them. [`Codec::pack`] keeps only the low 5, 5, and 12 bits of
/// `worker_id`, `process_id`, and `increment`, respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Parts {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// The worker that generated the snowflake (0-31).
    pub worker_id: u8,
    /// The process that generated the snowflake (0-31).
    pub process_id: u8,
    /// The per-process sequence number (0-4095).
    pub increment: u16,
}

/// Translates between raw 64-bit snowflakes and their [`Parts`], relative to a fixed epoch.
///
/// From the most significant bit, a snowflake holds 42 bits of milliseconds since the codec's epoch, a 5-bit worker
/// ID, a 5-bit process ID, and a 12-bit increment.
///
/// Codecs are immutable and cheap to copy. Snowflakes created by a codec borrow it, so a codec is usually stored in a
/// `static` (see [`DISCORD`](crate::DISCORD)) or kept alive next to the application's generator.
///
/// # Example
///
/// ```
/// use epochflake::{Codec, Parts};
///
/// let codec = Codec::new(1420070400000);
/// let parts = Parts {
///     timestamp: 1568274192129,
///     worker_id: 1,
///     process_id: 0,
///     increment: 10,
/// };
/// let snowflake = codec.pack(parts);
/// assert_eq!(621611758141964298, snowflake.get());
/// assert_eq!(parts, codec.unpack(&snowflake));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Codec {
    epoch: u64,
}

impl Codec {
    /// Creates a codec for the given epoch in milliseconds since the Unix epoch.
    ///
    /// Any value is accepted.
    #[inline]
    pub const fn new(epoch: u64) -> Self {
        Self { epoch }
    }

    /// Creates a codec for a compile-time [`Epoch`].
    #[inline]
    pub fn from_epoch<E>() -> Self
    where
        E: Epoch,
    {
        Self::new(E::millis_since_unix())
    }

    /// Returns this codec's epoch in milliseconds since the Unix epoch.
    #[inline]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Binds the given raw value to this codec without any validation.
    ///
    /// Every 64-bit pattern is a valid snowflake for this layout.
    #[inline]
    pub const fn wrap(&self, raw: u64) -> Snowflake<'_> {
        Snowflake::new(raw, Some(self))
    }

    /// Packs the given parts into a snowflake bound to this codec.
    ///
    /// Fields that exceed their bit width are truncated to their low bits instead of being rejected. A timestamp
    /// before the epoch wraps around like any other unsigned subtraction. Passing `None` returns the zero snowflake.
    ///
    /// ```
    /// # use epochflake::{Codec, Parts};
    /// let codec = Codec::new(0);
    /// assert_eq!(0, codec.pack(None).get());
    /// let snowflake = codec.pack(Parts {
    ///     timestamp: 0,
    ///     worker_id: 33,
    ///     process_id: 0,
    ///     increment: 4097,
    /// });
    /// assert_eq!(1, snowflake.get_worker_id());
    /// assert_eq!(1, snowflake.get_increment());
    /// ```
    pub fn pack<P>(&self, parts: P) -> Snowflake<'_>
    where
        P: Into<Option<Parts>>,
    {
        let parts: Option<Parts> = parts.into();
        self.wrap(parts.map_or(0, |parts| self.pack_raw(&parts)))
    }

    /// Packs the given parts into a raw integer.
    #[inline]
    pub fn pack_raw(&self, parts: &Parts) -> u64 {
        (parts.timestamp.wrapping_sub(self.epoch) << TIMESTAMP_SHIFT)
            | ((parts.worker_id as u64 & WORKER_ID_MAX) << WORKER_ID_SHIFT)
            | ((parts.process_id as u64 & PROCESS_ID_MAX) << PROCESS_ID_SHIFT)
            | (parts.increment as u64 & INCREMENT_MAX)
    }

    /// Decodes a snowflake relative to this codec's epoch.
    ///
    /// The snowflake's own codec (if any) is ignored.
    #[inline]
    pub fn unpack(&self, snowflake: &Snowflake<'_>) -> Parts {
        self.unpack_raw(snowflake.get())
    }

    /// Decodes a raw integer relative to this codec's epoch.
    #[inline]
    pub fn unpack_raw(&self, raw: u64) -> Parts {
        Parts {
            timestamp: elapsed(raw).wrapping_add(self.epoch),
            worker_id: worker_id(raw),
            process_id: process_id(raw),
            increment: increment(raw),
        }
    }

    /// Creates a generator for the given worker, using the ID of the current OS process.
    ///
    /// The OS process ID is truncated to its low byte, and [`pack`](Self::pack) later keeps only its low 5 bits.
    pub fn generator(&self, worker_id: u8) -> Generator<'_> {
        self.generator_with_process_id(worker_id, std::process::id() as u8)
    }

    /// Creates a generator for the given worker and process IDs.
    ///
    /// Use this if your deployment assigns process IDs itself instead of deriving them from the OS.
    pub fn generator_with_process_id(&self, worker_id: u8, process_id: u8) -> Generator<'_> {
        self.generator_with_clock(worker_id, process_id, SystemClock)
    }

    /// Creates a generator that reads the time from a custom [`Clock`].
    pub fn generator_with_clock<C>(&self, worker_id: u8, process_id: u8, clock: C) -> Generator<'_, C>
    where
        C: Clock,
    {
        Generator::new(self, worker_id, process_id, clock)
    }
}

#[inline]
pub(crate) const fn elapsed(raw: u64) -> u64 {
    raw >> TIMESTAMP_SHIFT
}

#[inline]
pub(crate) const fn worker_id(raw: u64) -> u8 {
    ((raw & WORKER_ID_MASK) >> WORKER_ID_SHIFT) as u8
}

#[inline]
pub(crate) const fn process_id(raw: u64) -> u8 {
    ((raw & PROCESS_ID_MASK) >> PROCESS_ID_SHIFT) as u8
}

#[inline]
pub(crate) const fn increment(raw: u64) -> u16 {
    (raw & INCREMENT_MASK) as u16
}

// End skip coverage
