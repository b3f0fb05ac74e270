//! Auditing global allocator

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

static ARMED: AtomicBool = AtomicBool::new(false);
static INSPECTED: AtomicUsize = AtomicUsize::new(0);
static UTF8_HITS: AtomicUsize = AtomicUsize::new(0);
static UTF16_HITS: AtomicUsize = AtomicUsize::new(0);
static NEEDLES: Mutex<Needles> = Mutex::new(Needles::empty());

struct Needles {
    utf8: Vec<u8>,
    utf16: Vec<u8>,
}

impl Needles {
    const fn empty() -> Self {
        Self { utf8: Vec::new(), utf16: Vec::new() }
    }

    fn for_secret(secret: &str) -> Self {
        Self {
            utf8: secret.as_bytes().to_vec(),
            utf16: secret.encode_utf16().flat_map(u16::to_ne_bytes).collect(),
        }
    }
}

/// Global allocator that searches released buffers for an audited secret
///
/// Allocations are zero-filled so inspecting a buffer never reads
/// uninitialised memory, and recycled memory cannot produce false hits.
#[derive(Debug, Default)]
pub struct WipeAuditAllocator {
    _private: (),
}

impl WipeAuditAllocator {
    /// Allocator for a `#[global_allocator]` static
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

// SAFETY: every request is forwarded to `System` unchanged; released buffers
// are only read, and only before they are handed back.
unsafe impl GlobalAlloc for WipeAuditAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if ARMED.load(Ordering::SeqCst) {
            // SAFETY: `ptr` is a live allocation of `layout.size()` bytes that
            // `alloc` zero-filled, so every byte is initialised.
            let released = unsafe { std::slice::from_raw_parts(ptr, layout.size()) };
            inspect(released);
        }
        unsafe { System.dealloc(ptr, layout) }
    }
}

fn inspect(released: &[u8]) {
    // try_lock: arming and disarming swap the needles on this lock.
    let Ok(needles) = NEEDLES.try_lock() else {
        return;
    };
    INSPECTED.fetch_add(1, Ordering::SeqCst);
    if contains(released, &needles.utf8) {
        UTF8_HITS.fetch_add(1, Ordering::SeqCst);
    }
    if contains(released, &needles.utf16) {
        UTF16_HITS.fetch_add(1, Ordering::SeqCst);
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Outcome of one [`audit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditReport {
    /// Buffers released and searched while the audit ran
    pub inspected: usize,
    /// Released buffers holding the secret as UTF-8
    pub utf8_hits: usize,
    /// Released buffers holding the secret as UTF-16 code units
    pub utf16_hits: usize,
}

impl AuditReport {
    /// No released buffer held the secret in either encoding
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.utf8_hits == 0 && self.utf16_hits == 0
    }
}

/// Run `body` while searching every released buffer for `secret`
///
/// Values that must outlive the audit, such as the caller's own copy of the
/// secret, have to be created before the call and dropped after it.
/// `inspected` stays at zero when [`WipeAuditAllocator`] is not the global
/// allocator.
pub fn audit<R>(secret: &str, body: impl FnOnce() -> R) -> (R, AuditReport) {
    let needles = Needles::for_secret(secret);
    let previous = swap_needles(needles);
    INSPECTED.store(0, Ordering::SeqCst);
    UTF8_HITS.store(0, Ordering::SeqCst);
    UTF16_HITS.store(0, Ordering::SeqCst);
    drop(previous);

    ARMED.store(true, Ordering::SeqCst);
    let result = body();
    ARMED.store(false, Ordering::SeqCst);

    let report = AuditReport {
        inspected: INSPECTED.load(Ordering::SeqCst),
        utf8_hits: UTF8_HITS.load(Ordering::SeqCst),
        utf16_hits: UTF16_HITS.load(Ordering::SeqCst),
    };
    drop(swap_needles(Needles::empty()));
    (result, report)
}

fn swap_needles(next: Needles) -> Needles {
    let mut needles = NEEDLES.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    std::mem::replace(&mut needles, next)
}
