// mprot.rs — memory-protection flips, in Win32 PAGE_* terms (the same
// choice the original makes, since those names are clearer than the
// Unix PROT_* bitmask and get redefined in terms of it on Unix).
//
// Converted from: examples/original_source/src/os.h (PAGE_* constants,
// os_mprot).

use crate::error::{PlatformError, Result};

pub const PAGE_NOACCESS: u32 = 1;
pub const PAGE_READONLY: u32 = 2;
pub const PAGE_READWRITE: u32 = 4;
pub const PAGE_EXECUTE_READ: u32 = 32;
pub const PAGE_EXECUTE_READWRITE: u32 = 64;

#[cfg(unix)]
fn to_unix_prot(mode: u32) -> libc::c_int {
    match mode {
        PAGE_NOACCESS => libc::PROT_NONE,
        PAGE_READONLY => libc::PROT_READ,
        PAGE_READWRITE => libc::PROT_READ | libc::PROT_WRITE,
        PAGE_EXECUTE_READ => libc::PROT_READ | libc::PROT_EXEC,
        PAGE_EXECUTE_READWRITE => libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
        _ => libc::PROT_READ,
    }
}

#[cfg(unix)]
pub fn mprotect(addr: *mut u8, len: usize, mode: u32) -> Result<()> {
    let page = page_size();
    let start = (addr as usize) & !(page - 1);
    let end = ((addr as usize) + len + page - 1) & !(page - 1);
    let rc = unsafe {
        libc::mprotect(start as *mut libc::c_void, end - start, to_unix_prot(mode))
    };
    if rc != 0 {
        return Err(PlatformError::Mprotect(crate::fs::last_error()));
    }
    Ok(())
}

#[cfg(unix)]
pub fn page_size() -> usize {
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

#[cfg(windows)]
pub fn mprotect(addr: *mut u8, len: usize, mode: u32) -> Result<()> {
    use windows_sys::Win32::System::Memory::VirtualProtect;
    let page = page_size();
    let start = (addr as usize) & !(page - 1);
    let end = ((addr as usize) + len + page - 1) & !(page - 1);
    let mut old = 0u32;
    let ok = unsafe { VirtualProtect(start as *mut _, end - start, mode, &mut old) };
    if ok == 0 {
        return Err(PlatformError::Mprotect(crate::fs::last_error()));
    }
    Ok(())
}

#[cfg(windows)]
pub fn page_size() -> usize {
    use windows_sys::Win32::System::SystemInformation::GetSystemInfo;
    let mut info = unsafe { std::mem::zeroed() };
    unsafe { GetSystemInfo(&mut info) };
    info.dwPageSize as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_reasonable() {
        let sz = page_size();
        assert!(sz >= 4096 && sz.is_power_of_two());
    }
}
