// secure_page.rs — a single locked, no-dump page, the mechanism a
// session-key-holding feature would build on. No such feature is
// implemented here (spec: the real one is unfinished/placeholder crypto and
// explicitly out of scope), but the platform primitive is real and tested.

use crate::error::{PlatformError, Result};
use crate::mprot;

pub struct SecurePage {
    ptr: *mut u8,
    len: usize,
}

impl SecurePage {
    /// Allocates one page, locks it against swap, and best-effort excludes
    /// it from core dumps / child-process inheritance.
    pub fn new() -> Result<Self> {
        let len = mprot::page_size();
        #[cfg(unix)]
        {
            let ptr = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    len,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            if ptr == libc::MAP_FAILED {
                return Err(PlatformError::LockPage(crate::fs::last_error()));
            }
            let ptr = ptr as *mut u8;
            unsafe {
                libc::mlock(ptr as *const _, len);
                #[cfg(target_os = "linux")]
                libc::madvise(ptr as *mut _, len, libc::MADV_DONTDUMP);
                #[cfg(target_os = "linux")]
                libc::madvise(ptr as *mut _, len, libc::MADV_DONTFORK);
            }
            Ok(SecurePage { ptr, len })
        }
        #[cfg(windows)]
        {
            use windows_sys::Win32::System::Memory::{VirtualAlloc, VirtualLock, MEM_COMMIT, MEM_RESERVE, PAGE_READWRITE as WIN_PAGE_RW};
            let ptr = unsafe { VirtualAlloc(std::ptr::null(), len, MEM_COMMIT | MEM_RESERVE, WIN_PAGE_RW) };
            if ptr.is_null() {
                return Err(PlatformError::LockPage(crate::fs::last_error()));
            }
            let ptr = ptr as *mut u8;
            unsafe {
                VirtualLock(ptr as *mut _, len);
            }
            Ok(SecurePage { ptr, len })
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wipes the page to zero. Callers holding key material should call this
    /// at the end of its lifetime rather than relying solely on `Drop`,
    /// since the moment of zeroisation is itself an observable event
    /// (spec: "zeroed on demo recording start; wiped on demo recording
    /// stop").
    pub fn zero(&mut self) {
        self.as_mut_slice().fill(0);
    }
}

impl Drop for SecurePage {
    fn drop(&mut self) {
        self.zero();
        #[cfg(unix)]
        unsafe {
            libc::munlock(self.ptr as *const _, self.len);
            libc::munmap(self.ptr as *mut _, self.len);
        }
        #[cfg(windows)]
        unsafe {
            use windows_sys::Win32::System::Memory::{VirtualFree, VirtualUnlock, MEM_RELEASE};
            VirtualUnlock(self.ptr as *mut _, self.len);
            VirtualFree(self.ptr as *mut _, 0, MEM_RELEASE);
        }
    }
}

// SAFETY: the page is exclusively owned by this handle; no aliasing occurs
// outside of explicit &mut borrows.
unsafe impl Send for SecurePage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_zeroed_and_wipeable() {
        let mut page = SecurePage::new().expect("secure page");
        assert!(page.len() >= 4096);
        page.as_mut_slice()[0] = 0xAB;
        assert_eq!(page.as_mut_slice()[0], 0xAB);
        page.zero();
        assert!(page.as_mut_slice().iter().all(|&b| b == 0));
    }
}
