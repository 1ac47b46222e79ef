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

//! The Discord epoch and a process-wide default generator using it.
//!
//! Applications that need a different epoch should build their own [`Codec`] and pass its generator around
//! explicitly. The default generator only exists for code that can't thread a generator through its call sites.

use crate::{Codec, Epoch, Error, Generator, Result};
use once_cell::sync::OnceCell;

/// The first millisecond of 2015 (UTC), the epoch of Discord's snowflakes.
pub const DISCORD_EPOCH: u64 = 1420070400000;

/// A codec using the [`DISCORD_EPOCH`].
pub static DISCORD: Codec = Codec::new(DISCORD_EPOCH);

static DEFAULT_GENERATOR: OnceCell<Generator<'static>> = OnceCell::new();

/// The [`DISCORD_EPOCH`] as a compile-time [`Epoch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscordEpoch;

impl Epoch for DiscordEpoch {
    #[inline]
    fn millis_since_unix() -> u64 {
        DISCORD_EPOCH
    }
}

/// Initializes the process-wide default generator for the given worker, using the [`DISCORD`] codec and the ID of the
/// current OS process.
///
/// If the default generator was already initialized, this returns [`Error::AlreadyInitialized`] and leaves the
/// existing generator (and its counter) untouched.
pub fn try_initialize(worker_id: u8) -> Result<&'static Generator<'static>> {
    match DEFAULT_GENERATOR.try_insert(DISCORD.generator(worker_id)) {
        Ok(generator) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                worker_id = generator.get_worker_id(),
                process_id = generator.get_process_id(),
                "initialized the default snowflake generator"
            );
            Ok(generator)
        }
        Err((_existing, _rejected)) => {
            #[cfg(feature = "tracing")]
            tracing::error!(
                worker_id = _existing.get_worker_id(),
                requested_worker_id = worker_id,
                "refusing to re-initialize the default snowflake generator"
            );
            Err(Error::AlreadyInitialized)
        }
    }
}

/// Initializes the process-wide default generator for the given worker.
///
/// # Panics
///
/// Panics if the default generator was already initialized. Replacing it would reset its counter and break the
/// ordering of snowflakes it already issued. Use [`try_initialize`] to handle this case yourself.
pub fn initialize(worker_id: u8) -> &'static Generator<'static> {
    match try_initialize(worker_id) {
        Ok(generator) => generator,
        Err(e) => panic!("{e}"),
    }
}

/// Returns the process-wide default generator, or `None` if it wasn't initialized yet.
#[inline]
pub fn default_generator() -> Option<&'static Generator<'static>> {
    DEFAULT_GENERATOR.get()
}

// End skip coverage
