//! Process-wide client lifecycle.
//!
//! The transport layer is set up once per process with [`init`] and torn down
//! once with [`disable`]. This is deliberately explicit and caller-managed
//! rather than hidden behind static initialization, because its safety window
//! matters: call `init` before issuing requests from multiple threads, and
//! call `disable` only after every connection and in-flight transaction has
//! finished. Calling `disable` while a request is running is a caller bug
//! this module does not guard against.
//!
//! `init` is idempotent; a second call is a no-op. `init` after `disable`
//! fails with [`Error::ClientShutDown`]: the lifecycle runs once per
//! process.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::errors::Error;

const UNINIT: u8 = 0;
const READY: u8 = 1;
const DOWN: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(UNINIT);

/// Brings the client layer up. Call once, before any multi-threaded use.
pub fn init() -> Result<(), Error> {
    match STATE.compare_exchange(UNINIT, READY, Ordering::SeqCst, Ordering::SeqCst) {
        Ok(_) => {
            log::debug!("client layer initialized");
            Ok(())
        }
        Err(READY) => Ok(()),
        Err(_) => Err(Error::ClientShutDown),
    }
}

/// Tears the client layer down. Call once, after all requests have completed.
pub fn disable() {
    STATE.store(DOWN, Ordering::SeqCst);
    log::debug!("client layer shut down");
}

/// Whether [`init`] has run and [`disable`] has not.
pub fn is_initialized() -> bool {
    STATE.load(Ordering::SeqCst) == READY
}
