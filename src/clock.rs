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

//! Wall-clock sources for [`Generator`](crate::Generator)s.

use std::time::SystemTime;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// Generators read the clock once per snowflake. The default implementation, [`SystemClock`], uses the system time.
/// Custom implementations are mostly useful in tests that need snowflakes from a known millisecond.
///
/// # Example
///
/// ```
/// use epochflake::{Clock, Codec};
///
/// #[derive(Debug)]
/// struct Frozen;
///
/// impl Clock for Frozen {
///     fn millis_since_unix(&self) -> u64 {
///         1568274192129
///     }
/// }
///
/// let codec = Codec::new(1420070400000);
/// let generator = codec.generator_with_clock(1, 0, Frozen);
/// let snowflake = generator.generate();
/// assert_eq!(1568274192129, snowflake.get_timestamp());
/// assert_eq!(0, snowflake.get_increment());
/// ```
pub trait Clock {
    /// Returns the current time as milliseconds since the Unix epoch.
    fn millis_since_unix(&self) -> u64;
}

/// A [`Clock`] backed by [`SystemTime::now`].
///
/// Reading this clock never fails. If the system clock is set before the Unix epoch, the negative offset wraps around
/// like an unsigned integer, so the snowflake's timestamp field receives the two's complement of the distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn millis_since_unix(&self) -> u64 {
        match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as u64,
            Err(e) => 0u64.wrapping_sub(e.duration().as_millis() as u64),
        }
    }
}

impl<C> Clock for &C
where
    C: Clock + ?Sized,
{
    #[inline]
    fn millis_since_unix(&self) -> u64 {
        (**self).millis_since_unix()
    }
}

// Skip coverage: We don't test the coverage of our unit tests
#[cfg(test)]
mod tests {
    use super::{Clock, SystemClock};
    use std::time::SystemTime;

    #[test]
    fn system_clock_tracks_system_time() {
        let before = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let now = SystemClock.millis_since_unix();
        let after = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        assert!(before <= now && now <= after);
    }

    #[test]
    fn references_are_clocks() {
        struct Fixed(u64);
        impl Clock for Fixed {
            fn millis_since_unix(&self) -> u64 {
                self.0
            }
        }
        let clock = Fixed(42);
        assert_eq!(42, (&clock).millis_since_unix());
    }
}
// End skip coverage
