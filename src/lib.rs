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

//! This crate implements epoch-relative snowflake IDs in the layout popularized by Discord.
//!
//! A snowflake is a 64-bit integer. From the most significant bit, it holds 42 bits of milliseconds since an epoch,
//! a 5-bit worker ID, a 5-bit process ID, and a 12-bit increment. Independent processes with distinct worker/process
//! pairs can mint unique, roughly time-ordered IDs without any coordination. Assigning those pairs is up to you; two
//! generators sharing a worker and process ID *will* produce colliding snowflakes.
//!
//! The crate consists of two parts:
//! * a [`Codec`] that packs [`Parts`] into [`Snowflake`]s and unpacks them again, relative to its epoch, and
//! * a [`Generator`] that mints new snowflakes from the current time and a per-generator counter.
//!
//! Snowflakes borrow the codec that created them, so they can report absolute timestamps. Snowflakes parsed from
//! text don't know their epoch until you [`bind`](Snowflake::bind) them to a codec.
//!
//! # Example
//!
//! ```
//! use epochflake::{Codec, Parts};
//!
//! // Our epoch for this example is the first millisecond of 2015
//! let codec = Codec::new(1420070400000);
//!
//! // Decode a snowflake we received from elsewhere
//! let snowflake = codec.wrap(1073325901825187841);
//! assert_eq!(
//!     Parts {
//!         timestamp: 1675971236426,
//!         worker_id: 2,
//!         process_id: 2,
//!         increment: 1,
//!     },
//!     snowflake.parts()
//! );
//!
//! // Mint new snowflakes as worker 1
//! let generator = codec.generator(1);
//! let first = generator.generate();
//! let second = generator.generate();
//! assert_ne!(first, second);
//! assert!(first.get_timestamp() <= second.get_timestamp());
//! ```
//!
//! # Features
//!
//! * `lock-free` (default): generators advance their counter with an atomic operation.
//! * `blocking`: generators advance their counter while holding a mutex. If both features are enabled,
//!   [`Generator::generate`] uses the lock-free counter.
//! * `serde`: (de)serializes snowflakes as decimal strings (see the `interchange` module docs).
//! * `tracing`: instruments snowflake generation and the default generator's initialization.

#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(feature = "blocking", feature = "lock-free")))]
compile_error!("you must enable at least one generator implementation (blocking or lock-free)");

mod clock;
mod codec;
mod error;
mod generator;
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod interchange;
mod preset;
mod snowflake;
mod sync;

pub use crate::clock::{Clock, SystemClock};
pub use crate::codec::{Codec, Epoch, Parts, INCREMENT_BITS, PROCESS_ID_BITS, TIMESTAMP_BITS, WORKER_ID_BITS};
pub use crate::error::{Error, Result};
pub use crate::generator::Generator;
pub use crate::preset::{
    default_generator, initialize, try_initialize, DiscordEpoch, DISCORD, DISCORD_EPOCH,
};
pub use crate::snowflake::Snowflake;
