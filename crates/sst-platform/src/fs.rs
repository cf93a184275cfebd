// fs.rs — file I/O entry points of the platform seam.
//
// Converted from: examples/original_source/src/os.h (entry-point list),
// examples/mattx86-myq2-rust/crates/myq2-common/src/files.rs (style).

use crate::error::{PlatformError, RawOsError, Result};
use crate::native_str::NativeString;
use std::path::Path;

/// An OS-specific file handle. Negative-one is never returned here -- the
/// seam uses `Result` instead, unlike the C original's `-1`-on-error
/// convention, which `sst-con`/`sst-hook` callers would otherwise have to
/// keep re-checking.
#[derive(Debug)]
pub struct FileHandle(RawHandle);

#[cfg(unix)]
type RawHandle = libc::c_int;
#[cfg(windows)]
type RawHandle = windows_sys::Win32::Foundation::HANDLE;

pub fn last_error() -> RawOsError {
    #[cfg(unix)]
    {
        RawOsError(std::io::Error::last_os_error().raw_os_error().unwrap_or(-1))
    }
    #[cfg(windows)]
    {
        RawOsError(unsafe { windows_sys::Win32::Foundation::GetLastError() } as i32)
    }
}

#[cfg(unix)]
pub fn open_read(path: &Path) -> Result<FileHandle> {
    let ns = NativeString::from_path(path);
    let fd = unsafe { libc::open(ns.as_c_char_ptr(), libc::O_RDONLY) };
    if fd < 0 {
        return Err(PlatformError::Open {
            path: path.display().to_string(),
            source: last_error(),
        });
    }
    Ok(FileHandle(fd))
}

#[cfg(unix)]
pub fn open_write(path: &Path) -> Result<FileHandle> {
    let ns = NativeString::from_path(path);
    let fd = unsafe { libc::open(ns.as_c_char_ptr(), libc::O_WRONLY | libc::O_CREAT, 0o644) };
    if fd < 0 {
        return Err(PlatformError::Open {
            path: path.display().to_string(),
            source: last_error(),
        });
    }
    Ok(FileHandle(fd))
}

#[cfg(unix)]
pub fn open_writetrunc(path: &Path) -> Result<FileHandle> {
    let ns = NativeString::from_path(path);
    let fd = unsafe {
        libc::open(
            ns.as_c_char_ptr(),
            libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
            0o644,
        )
    };
    if fd < 0 {
        return Err(PlatformError::Open {
            path: path.display().to_string(),
            source: last_error(),
        });
    }
    Ok(FileHandle(fd))
}

#[cfg(unix)]
pub fn read(f: &FileHandle, buf: &mut [u8]) -> Result<usize> {
    let n = unsafe { libc::read(f.0, buf.as_mut_ptr() as *mut _, buf.len()) };
    if n < 0 {
        return Err(PlatformError::Read(last_error()));
    }
    Ok(n as usize)
}

#[cfg(unix)]
pub fn write(f: &FileHandle, buf: &[u8]) -> Result<usize> {
    let n = unsafe { libc::write(f.0, buf.as_ptr() as *const _, buf.len()) };
    if n < 0 {
        return Err(PlatformError::Write(last_error()));
    }
    Ok(n as usize)
}

#[cfg(unix)]
pub fn file_size(f: &FileHandle) -> Result<i64> {
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::fstat(f.0, &mut st) };
    if rc != 0 {
        return Err(PlatformError::Read(last_error()));
    }
    Ok(st.st_size as i64)
}

#[cfg(unix)]
pub fn close(f: FileHandle) {
    unsafe {
        libc::close(f.0);
    }
}

#[cfg(unix)]
pub fn mkdir(path: &Path) -> Result<()> {
    let ns = NativeString::from_path(path);
    let rc = unsafe { libc::mkdir(ns.as_c_char_ptr(), 0o755) };
    if rc != 0 {
        return Err(PlatformError::Mkdir {
            path: path.display().to_string(),
            source: last_error(),
        });
    }
    Ok(())
}

#[cfg(unix)]
pub fn rmdir(path: &Path) -> Result<()> {
    let ns = NativeString::from_path(path);
    let rc = unsafe { libc::rmdir(ns.as_c_char_ptr()) };
    if rc != 0 {
        return Err(PlatformError::Remove {
            path: path.display().to_string(),
            source: last_error(),
        });
    }
    Ok(())
}

#[cfg(unix)]
pub fn unlink(path: &Path) -> Result<()> {
    let ns = NativeString::from_path(path);
    let rc = unsafe { libc::unlink(ns.as_c_char_ptr()) };
    if rc != 0 {
        return Err(PlatformError::Remove {
            path: path.display().to_string(),
            source: last_error(),
        });
    }
    Ok(())
}

#[cfg(unix)]
pub fn getcwd() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_default()
}

// --- Windows ---

#[cfg(windows)]
mod win {
    use super::*;
    use windows_sys::Win32::Foundation::{CloseHandle, GENERIC_READ, GENERIC_WRITE, INVALID_HANDLE_VALUE};
    use windows_sys::Win32::Storage::FileSystem::{
        CreateFileW, GetFileSizeEx, ReadFile, WriteFile, CREATE_ALWAYS, CREATE_NEW, FILE_SHARE_READ,
        OPEN_ALWAYS, OPEN_EXISTING,
    };

    pub fn open_read(path: &Path) -> Result<FileHandle> {
        let ns = NativeString::from_path(path);
        let h = unsafe {
            CreateFileW(
                ns.as_wide_ptr(),
                GENERIC_READ,
                FILE_SHARE_READ,
                std::ptr::null(),
                OPEN_EXISTING,
                0,
                std::ptr::null_mut(),
            )
        };
        if h == INVALID_HANDLE_VALUE {
            return Err(PlatformError::Open {
                path: path.display().to_string(),
                source: last_error(),
            });
        }
        Ok(FileHandle(h))
    }

    pub fn open_write(path: &Path) -> Result<FileHandle> {
        create(path, OPEN_ALWAYS)
    }

    pub fn open_writetrunc(path: &Path) -> Result<FileHandle> {
        create(path, CREATE_ALWAYS)
    }

    fn create(path: &Path, disposition: u32) -> Result<FileHandle> {
        let ns = NativeString::from_path(path);
        let h = unsafe {
            CreateFileW(
                ns.as_wide_ptr(),
                GENERIC_WRITE,
                0,
                std::ptr::null(),
                disposition,
                0,
                std::ptr::null_mut(),
            )
        };
        if h == INVALID_HANDLE_VALUE {
            return Err(PlatformError::Open {
                path: path.display().to_string(),
                source: last_error(),
            });
        }
        Ok(FileHandle(h))
    }

    pub fn read(f: &FileHandle, buf: &mut [u8]) -> Result<usize> {
        let mut n = 0u32;
        let ok = unsafe {
            ReadFile(
                f.0,
                buf.as_mut_ptr(),
                buf.len() as u32,
                &mut n,
                std::ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(PlatformError::Read(last_error()));
        }
        Ok(n as usize)
    }

    pub fn write(f: &FileHandle, buf: &[u8]) -> Result<usize> {
        let mut n = 0u32;
        let ok = unsafe {
            WriteFile(
                f.0,
                buf.as_ptr(),
                buf.len() as u32,
                &mut n,
                std::ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(PlatformError::Write(last_error()));
        }
        Ok(n as usize)
    }

    pub fn file_size(f: &FileHandle) -> Result<i64> {
        let mut sz: i64 = 0;
        let ok = unsafe { GetFileSizeEx(f.0, &mut sz) };
        if ok == 0 {
            return Err(PlatformError::Read(last_error()));
        }
        Ok(sz)
    }

    pub fn close(f: FileHandle) {
        unsafe {
            CloseHandle(f.0);
        }
    }

    pub fn mkdir(path: &Path) -> Result<()> {
        use windows_sys::Win32::Storage::FileSystem::CreateDirectoryW;
        let ns = NativeString::from_path(path);
        let ok = unsafe { CreateDirectoryW(ns.as_wide_ptr(), std::ptr::null()) };
        if ok == 0 {
            return Err(PlatformError::Mkdir {
                path: path.display().to_string(),
                source: last_error(),
            });
        }
        Ok(())
    }

    pub fn rmdir(path: &Path) -> Result<()> {
        use windows_sys::Win32::Storage::FileSystem::RemoveDirectoryW;
        let ns = NativeString::from_path(path);
        let ok = unsafe { RemoveDirectoryW(ns.as_wide_ptr()) };
        if ok == 0 {
            return Err(PlatformError::Remove {
                path: path.display().to_string(),
                source: last_error(),
            });
        }
        Ok(())
    }

    pub fn unlink(path: &Path) -> Result<()> {
        use windows_sys::Win32::Storage::FileSystem::DeleteFileW;
        let ns = NativeString::from_path(path);
        let ok = unsafe { DeleteFileW(ns.as_wide_ptr()) };
        if ok == 0 {
            return Err(PlatformError::Remove {
                path: path.display().to_string(),
                source: last_error(),
            });
        }
        Ok(())
    }

    pub fn getcwd() -> std::path::PathBuf {
        std::env::current_dir().unwrap_or_default()
    }

    // silence "unused" for disposition import re-export pattern above
    #[allow(dead_code)]
    const _UNUSED: u32 = CREATE_NEW;
}

#[cfg(windows)]
pub use win::{close, file_size, getcwd, mkdir, open_read, open_write, open_writetrunc, read, rmdir, unlink, write};

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn write_read_roundtrip() {
        let path = temp_dir().join(format!("sst-platform-test-{}", std::process::id()));
        {
            let f = open_writetrunc(&path).expect("open for write");
            write(&f, b"hello sst").expect("write");
            close(f);
        }
        {
            let f = open_read(&path).expect("open for read");
            let mut buf = [0u8; 32];
            let n = read(&f, &mut buf).expect("read");
            assert_eq!(&buf[..n], b"hello sst");
            close(f);
        }
        let _ = unlink(&path);
    }

    #[test]
    fn file_size_matches_written_length() {
        let path = temp_dir().join(format!("sst-platform-test-size-{}", std::process::id()));
        let f = open_writetrunc(&path).expect("open");
        write(&f, b"0123456789").expect("write");
        let sz = file_size(&f).expect("size");
        close(f);
        assert_eq!(sz, 10);
        let _ = unlink(&path);
    }
}
