//! Heap auditing for tests that handle key material
//!
//! [`WipeAuditAllocator`] wraps the system allocator. While an [`audit`] is
//! running, every buffer handed back to the allocator is searched for the
//! secret before it is released, so a copy that was freed without being
//! wiped shows up in the [`AuditReport`].
//!
//! A test binary opts in by installing the allocator:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: WipeAuditAllocator = WipeAuditAllocator::new();
//! ```
//!
//! Audits share global state, so a binary should run one audited test.

mod allocator;

pub use allocator::{audit, AuditReport, WipeAuditAllocator};
