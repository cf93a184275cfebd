// rand.rs — cryptographically random bytes, OS-supplied. No userspace CSPRNG
// is implemented here; that's explicitly out of scope (spec §1: "third-party
// math (X25519/BLAKE2b/ChaCha)" and the session-key feature using it are not
// implemented). This is only the OS entry point such a feature would need.

#[cfg(unix)]
pub fn random_bytes(buf: &mut [u8]) {
    // getrandom(2) on Linux; falls back to /dev/urandom semantics via libc
    // on other Unix-likes through this same call where available.
    #[cfg(target_os = "linux")]
    unsafe {
        libc::syscall(libc::SYS_getrandom, buf.as_mut_ptr(), buf.len(), 0);
    }
    #[cfg(not(target_os = "linux"))]
    unsafe {
        libc::arc4random_buf(buf.as_mut_ptr() as *mut _, buf.len());
    }
}

#[cfg(windows)]
pub fn random_bytes(buf: &mut [u8]) {
    use windows_sys::Win32::Security::Cryptography::{
        BCryptGenRandom, BCRYPT_USE_SYSTEM_PREFERRED_RNG,
    };
    unsafe {
        BCryptGenRandom(
            std::ptr::null_mut(),
            buf.as_mut_ptr(),
            buf.len() as u32,
            BCRYPT_USE_SYSTEM_PREFERRED_RNG,
        );
    }
}
