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

//! The snowflake generator.

use crate::clock::{Clock, SystemClock};
#[cfg(feature = "lock-free")]
use crate::sync::atomic::{self, AtomicU16};
#[cfg(feature = "blocking")]
use crate::sync::Mutex;
use crate::{Codec, Parts, Snowflake};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A thread-safe snowflake generator bound to a [`Codec`], a worker ID, and a process ID.
///
/// Every call to [`generate`](Self::generate) reads the clock, takes the current value of a 16-bit counter, and
/// advances the counter by one. The counter wraps around silently after 65535, and only its low 12 bits end up in the
/// snowflake's increment field. A generator therefore produces duplicate snowflakes if it's asked for more than 4096
/// snowflakes within one millisecond. The generator neither detects nor prevents this.
///
/// The counter never resets when the millisecond changes. Within one millisecond, the increments of consecutive
/// snowflakes strictly increase by one (until they wrap around).
///
/// Generators are usually created with [`Codec::generator`] and live as long as the process. They can be shared
/// between threads by reference. Concurrent callers always receive distinct counter values, but the clock is read
/// outside the counter's critical section, so a thread that took a smaller counter value might still see a later
/// millisecond than a thread that took a larger one.
///
/// # Example
///
/// ```
/// use epochflake::Codec;
///
/// let codec = Codec::new(1420070400000);
/// let generator = codec.generator_with_process_id(1, 2);
/// let first = generator.generate();
/// let second = generator.generate();
/// assert_ne!(first, second);
/// assert_eq!(1, second.get_worker_id());
/// assert_eq!(2, second.get_process_id());
/// assert_eq!(first.get_increment() + 1, second.get_increment());
/// ```
#[derive(Debug)]
pub struct Generator<'c, C = SystemClock>
where
    C: Clock,
{
    codec: &'c Codec,
    worker_id: u8,
    process_id: u8,
    clock: C,
    #[cfg(feature = "blocking")]
    counter_blocking: Mutex<u16>,
    #[cfg(feature = "lock-free")]
    counter_atomic: AtomicU16,
}

impl<'c, C> Generator<'c, C>
where
    C: Clock,
{
    pub(crate) fn new(codec: &'c Codec, worker_id: u8, process_id: u8, clock: C) -> Self {
        Self {
            codec,
            worker_id,
            process_id,
            clock,
            #[cfg(feature = "blocking")]
            counter_blocking: Mutex::new(0),
            #[cfg(feature = "lock-free")]
            counter_atomic: AtomicU16::new(0),
        }
    }

    /// Generates a new snowflake using the *lock-free* counter.
    ///
    /// This method is available if the `lock-free` feature is enabled. It behaves exactly like
    /// [`generate_lock_free`](Self::generate_lock_free). If only the `blocking` feature is enabled, this method uses
    /// [`generate_blocking`](Self::generate_blocking) instead. Code calling `generate` keeps working when switching
    /// between the two features.
    #[cfg(feature = "lock-free")]
    #[inline]
    pub fn generate(&self) -> Snowflake<'c> {
        self.generate_lock_free()
    }

    /// Generates a new snowflake using the *blocking* counter.
    ///
    /// This method is available if only the `blocking` feature is enabled. It behaves exactly like
    /// [`generate_blocking`](Self::generate_blocking).
    #[cfg(all(feature = "blocking", not(feature = "lock-free")))]
    #[inline]
    pub fn generate(&self) -> Snowflake<'c> {
        self.generate_blocking()
    }

    /// Generates a new snowflake, advancing the counter while holding a lock.
    ///
    /// The returned snowflake carries the current time, this generator's worker and process IDs, and the counter value
    /// from *before* it was advanced.
    #[cfg(feature = "blocking")]
    #[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_blocking(&self) -> Snowflake<'c> {
        let increment = {
            // Nothing that holds this lock can panic, but recover the counter anyway instead of failing the caller
            let mut counter = self
                .counter_blocking
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let increment = *counter;
            *counter = increment.wrapping_add(1);
            increment
        };
        self.pack(increment)
    }

    /// Generates a new snowflake, advancing the counter with a single atomic operation.
    ///
    /// The returned snowflake carries the current time, this generator's worker and process IDs, and the counter value
    /// from *before* it was advanced.
    ///
    /// # Lock-freedom
    ///
    /// `fetch_add` wraps around on overflow and always succeeds, so this method is even wait-free.
    #[cfg(feature = "lock-free")]
    #[cfg_attr(docsrs, doc(cfg(feature = "lock-free")))]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_lock_free(&self) -> Snowflake<'c> {
        // The counter doesn't guard any other memory, so we don't need to synchronize with other threads here.
        let increment = self.counter_atomic.fetch_add(1, atomic::Ordering::Relaxed);
        self.pack(increment)
    }

    /// Returns the worker ID stored in every snowflake of this generator.
    #[inline]
    pub fn get_worker_id(&self) -> u8 {
        self.worker_id
    }

    /// Returns the process ID stored in every snowflake of this generator.
    #[inline]
    pub fn get_process_id(&self) -> u8 {
        self.process_id
    }

    /// Returns the codec this generator packs snowflakes with.
    #[inline]
    pub fn codec(&self) -> &'c Codec {
        self.codec
    }

    fn pack(&self, increment: u16) -> Snowflake<'c> {
        self.codec.pack(Parts {
            timestamp: self.clock.millis_since_unix(),
            worker_id: self.worker_id,
            process_id: self.process_id,
            increment,
        })
    }
}

// Skip coverage: We don't test the coverage of our unit tests
#[cfg(all(test, not(loom)))]
mod tests {
    use crate::{Clock, Codec, Snowflake};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;

    const EPOCH: u64 = 1420070400000;

    #[derive(Debug)]
    struct ManualClock(AtomicU64);

    impl ManualClock {
        fn at(millis: u64) -> Self {
            Self(AtomicU64::new(millis))
        }
        fn advance(&self, millis: u64) {
            self.0.fetch_add(millis, Ordering::Relaxed);
        }
    }

    impl Clock for ManualClock {
        fn millis_since_unix(&self) -> u64 {
            self.0.load(Ordering::Relaxed)
        }
    }

    #[test]
    fn increments_within_one_millisecond() {
        let codec = Codec::new(EPOCH);
        let generator = codec.generator_with_clock(3, 7, ManualClock::at(EPOCH + 5000));
        let snowflakes: Vec<Snowflake> = (0..100).map(|_| generator.generate()).collect();
        for (i, snowflake) in snowflakes.iter().enumerate() {
            assert_eq!(i as u16, snowflake.get_increment());
            assert_eq!(EPOCH + 5000, snowflake.get_timestamp());
            assert_eq!(3, snowflake.get_worker_id());
            assert_eq!(7, snowflake.get_process_id());
            assert_eq!(Some(&codec), snowflake.codec());
        }
        for pair in snowflakes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn counter_carries_over_milliseconds() {
        let codec = Codec::new(EPOCH);
        let clock = ManualClock::at(EPOCH);
        let generator = codec.generator_with_clock(0, 0, &clock);
        assert_eq!(0, generator.generate().get_increment());
        clock.advance(1);
        let snowflake = generator.generate();
        assert_eq!(1, snowflake.get_increment());
        assert_eq!(EPOCH + 1, snowflake.get_timestamp());
    }

    // The increment field wraps after 4096 snowflakes while the counter itself wraps after 65536
    #[test]
    fn counter_wraps_silently() {
        let codec = Codec::new(EPOCH);
        let generator = codec.generator_with_clock(0, 0, ManualClock::at(EPOCH));
        let increments: Vec<u16> = (0..=u16::MAX as u32 + 1)
            .map(|_| generator.generate().get_increment())
            .collect();
        assert_eq!(4095, increments[4095]);
        assert_eq!(0, increments[4096]);
        assert_eq!(4095, increments[u16::MAX as usize]);
        assert_eq!(0, increments[u16::MAX as usize + 1]);
    }

    #[test]
    fn uses_the_system_clock_by_default() {
        let codec = Codec::new(EPOCH);
        let generator = codec.generator_with_process_id(1, 1);
        let before = crate::SystemClock.millis_since_unix();
        let snowflake = generator.generate();
        let after = crate::SystemClock.millis_since_unix();
        assert!(before <= snowflake.get_timestamp() && snowflake.get_timestamp() <= after);
    }

    #[test]
    fn unique_across_threads() {
        let codec = Codec::new(EPOCH);
        let generator = codec.generator_with_clock(0, 0, ManualClock::at(EPOCH));
        let snowflakes: Vec<u64> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..1000).map(|_| generator.generate().get()).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        let set: HashSet<_> = snowflakes.iter().collect();
        assert_eq!(4000, set.len());
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn blocking_increments() {
        let codec = Codec::new(EPOCH);
        let generator = codec.generator_with_clock(0, 0, ManualClock::at(EPOCH));
        for i in 0..10 {
            assert_eq!(i, generator.generate_blocking().get_increment());
        }
    }

    #[cfg(feature = "lock-free")]
    #[test]
    fn lock_free_increments() {
        let codec = Codec::new(EPOCH);
        let generator = codec.generator_with_clock(0, 0, ManualClock::at(EPOCH));
        for i in 0..10 {
            assert_eq!(i, generator.generate_lock_free().get_increment());
        }
    }
}
// End skip coverage
