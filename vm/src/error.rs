//! Error types returned by the fault handler and the components it drives.

use core::fmt;

use crate::collab::Process;

/// Result alias used throughout the crate.
pub type VmResult<T> = Result<T, VmError>;

/// Errors the fault handler can report to its caller.
///
/// Each variant maps to the errno the trap handler delivers to the faulting
/// process; see `VmError::errno`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VmError {
    /// A write landed on a read-only mapping.
    AccessViolation,
    /// The fault address is outside every segment of the current address
    /// space, or there is no current address space at all.
    AddressingError,
    /// The fault kind reported by the trap handler was not one of the three
    /// expected kinds.
    InvalidFault,
    /// A segment load or swap transfer came back short.
    IoFailure,
    /// Physical memory or swap capacity is exhausted. Distinct from the
    /// above because callers must treat it as unrecoverable.
    OutOfMemory,
}

impl VmError {
    /// The errno this error should be reported to userspace as.
    pub const fn errno(self) -> i32 {
        match self {
            VmError::AccessViolation => libc_errno::EACCES,
            VmError::AddressingError => libc_errno::EFAULT,
            VmError::InvalidFault => libc_errno::EINVAL,
            VmError::IoFailure => libc_errno::EFAULT,
            VmError::OutOfMemory => libc_errno::ENOMEM,
        }
    }

    /// Logs this error at `warn!` and returns it, mirroring the
    /// log-then-return idiom used throughout the fault path.
    pub fn log_return<T>(self) -> VmResult<T> {
        log::warn!("vm: returning {:?} (errno {})", self, self.errno());
        Err(self)
    }

    /// Logs at `error!` and halts through the process collaborator. Used for
    /// invariant violations (coremap corruption, swap exhaustion) that the
    /// kernel cannot recover from by returning an error code.
    pub fn fatal(self, process: &dyn Process, msg: &str) -> ! {
        log::error!("vm: fatal: {} ({:?})", msg, self);
        process.panic(msg)
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VmError::AccessViolation => "write to read-only mapping",
            VmError::AddressingError => "address outside any segment",
            VmError::InvalidFault => "unrecognized fault kind",
            VmError::IoFailure => "short read/write on backing store",
            VmError::OutOfMemory => "physical memory or swap exhausted",
        };
        f.write_str(s)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VmError {}

/// Minimal errno constants, named the way libc spells them, so `VmError`
/// does not need an actual libc binding to state its mapping.
mod libc_errno {
    pub const EACCES: i32 = 13;
    pub const EFAULT: i32 = 14;
    pub const EINVAL: i32 = 22;
    pub const ENOMEM: i32 = 12;
}
