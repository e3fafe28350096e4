use crate::bindings;
use crate::original::{original_getgid, original_getuid, original_gethostname, original_uname};
use std::os::raw::c_char;

/// Copies `value` into a fixed-size `c_char` buffer, truncating to fit and
/// always null-terminating. Used for both `gethostname`'s caller-provided
/// buffer and `uname`'s fixed-size struct fields.
unsafe fn write_into(value: &str, dest: *mut c_char, capacity: usize) {
    if capacity == 0 {
        return;
    }
    let bytes = value.as_bytes();
    let copy_len = bytes.len().min(capacity - 1);
    std::ptr::copy_nonoverlapping(bytes.as_ptr() as *const c_char, dest, copy_len);
    *dest.add(copy_len) = 0;
}

#[no_mangle]
pub unsafe extern "C" fn getuid() -> libc::uid_t {
    match bindings::lookup("getuid").and_then(|v| v.parse().ok()) {
        Some(value) => value,
        None => original_getuid(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn getgid() -> libc::gid_t {
    match bindings::lookup("getgid").and_then(|v| v.parse().ok()) {
        Some(value) => value,
        None => original_getgid(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn gethostname(name: *mut c_char, len: libc::size_t) -> libc::c_int {
    match bindings::lookup("gethostname") {
        Some(value) => {
            write_into(&value, name, len);
            0
        }
        None => original_gethostname(name, len),
    }
}

#[no_mangle]
pub unsafe extern "C" fn uname(buf: *mut libc::utsname) -> libc::c_int {
    let ret = original_uname(buf);
    if ret == 0 {
        if let Some(value) = bindings::lookup("uname") {
            let nodename = (*buf).nodename.as_mut_ptr();
            let capacity = (*buf).nodename.len();
            write_into(&value, nodename, capacity);
        }
    }
    ret
}
