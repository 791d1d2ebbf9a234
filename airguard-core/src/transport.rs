//! Blocking read with data-ready polling
//!
//! The module raises a data-ready flag once per measurement interval. A read
//! polls the transport every `poll_interval_ms` until it gets a reading or
//! `timeout_ms` have elapsed:
//!
//! ```text
//! t=0    read_raw -> WouldBlock, delay 50
//! t=50   read_raw -> WouldBlock, delay 50
//! ...
//! t=500  read_raw -> WouldBlock, give up: Timeout { waited_ms: 500 }
//! ```
//!
//! The last delay is cut short so the total wait never exceeds `timeout_ms`.
//! A bus error ends the read immediately. A failed read never yields a
//! partial result.

use crate::errors::TransportError;
use crate::measurement::RawReading;
use crate::traits::{Delay, Transport};

/// Poll `transport` until it produces a reading or the timeout expires
pub fn read_measurement<T, D>(
    transport: &mut T,
    delay: &mut D,
    timeout_ms: u32,
    poll_interval_ms: u32,
) -> Result<RawReading, TransportError>
where
    T: Transport + ?Sized,
    D: Delay + ?Sized,
{
    let mut waited_ms: u32 = 0;

    loop {
        match transport.read_raw() {
            Ok(raw) => return Ok(raw),
            Err(nb::Error::Other(err)) => return Err(err),
            Err(nb::Error::WouldBlock) => {}
        }

        if waited_ms >= timeout_ms {
            return Err(TransportError::Timeout { waited_ms });
        }

        let step_ms = poll_interval_ms.min(timeout_ms - waited_ms);
        delay.delay_ms(step_ms);
        waited_ms += step_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pending {
        ready_after: u32,
        polls: u32,
    }

    impl Transport for Pending {
        fn read_raw(&mut self) -> nb::Result<RawReading, TransportError> {
            self.polls += 1;
            if self.polls > self.ready_after {
                Ok(RawReading::INVALID)
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ms: u32,
    }

    impl Delay for CountingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    #[test]
    fn ready_immediately_does_not_delay() {
        let mut transport = Pending { ready_after: 0, polls: 0 };
        let mut delay = CountingDelay::default();
        assert!(read_measurement(&mut transport, &mut delay, 500, 50).is_ok());
        assert_eq!(delay.total_ms, 0);
    }

    #[test]
    fn polls_until_ready() {
        let mut transport = Pending { ready_after: 3, polls: 0 };
        let mut delay = CountingDelay::default();
        assert!(read_measurement(&mut transport, &mut delay, 500, 50).is_ok());
        assert_eq!(transport.polls, 4);
        assert_eq!(delay.total_ms, 150);
    }

    #[test]
    fn gives_up_after_timeout() {
        let mut transport = Pending { ready_after: u32::MAX, polls: 0 };
        let mut delay = CountingDelay::default();
        assert_eq!(
            read_measurement(&mut transport, &mut delay, 500, 50),
            Err(TransportError::Timeout { waited_ms: 500 })
        );
        // One check at t=0 plus one after each of the ten delays
        assert_eq!(transport.polls, 11);
    }

    #[test]
    fn last_delay_is_clamped_to_timeout() {
        let mut transport = Pending { ready_after: u32::MAX, polls: 0 };
        let mut delay = CountingDelay::default();
        assert_eq!(
            read_measurement(&mut transport, &mut delay, 500, 300),
            Err(TransportError::Timeout { waited_ms: 500 })
        );
        assert_eq!(delay.total_ms, 500);
        // t=0, t=300 and t=500
        assert_eq!(transport.polls, 3);
    }

    #[test]
    fn poll_longer_than_timeout_waits_only_the_timeout() {
        let mut transport = Pending { ready_after: 1, polls: 0 };
        let mut delay = CountingDelay::default();
        assert!(read_measurement(&mut transport, &mut delay, 100, 250).is_ok());
        assert_eq!(delay.total_ms, 100);
    }

    #[test]
    fn bus_error_is_returned_at_once() {
        struct Broken;
        impl Transport for Broken {
            fn read_raw(&mut self) -> nb::Result<RawReading, TransportError> {
                Err(nb::Error::Other(TransportError::Bus { reason: "crc mismatch" }))
            }
        }

        let mut delay = CountingDelay::default();
        assert_eq!(
            read_measurement(&mut Broken, &mut delay, 500, 50),
            Err(TransportError::Bus { reason: "crc mismatch" })
        );
        assert_eq!(delay.total_ms, 0);
    }
}
