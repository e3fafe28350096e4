use std::ffi::CStr;
use std::sync::OnceLock;

type GetuidFn = unsafe extern "C" fn() -> libc::uid_t;
type GetgidFn = unsafe extern "C" fn() -> libc::gid_t;
type GethostnameFn = unsafe extern "C" fn(*mut libc::c_char, libc::size_t) -> libc::c_int;
type UnameFn = unsafe extern "C" fn(*mut libc::utsname) -> libc::c_int;

static ORIGINAL_GETUID: OnceLock<GetuidFn> = OnceLock::new();
static ORIGINAL_GETGID: OnceLock<GetgidFn> = OnceLock::new();
static ORIGINAL_GETHOSTNAME: OnceLock<GethostnameFn> = OnceLock::new();
static ORIGINAL_UNAME: OnceLock<UnameFn> = OnceLock::new();

/// Resolves the next `name` symbol in the dynamic-loader chain past this
/// library, i.e. the libc implementation this interposer shadows.
unsafe fn resolve<T: Copy>(name: &CStr) -> Option<T> {
    let symbol = libc::dlsym(libc::RTLD_NEXT, name.as_ptr());
    if symbol.is_null() {
        return None;
    }
    Some(std::mem::transmute_copy::<*mut libc::c_void, T>(&symbol))
}

pub unsafe fn original_getuid() -> libc::uid_t {
    let f = *ORIGINAL_GETUID.get_or_init(|| {
        resolve(c"getuid").expect("libc always provides getuid")
    });
    f()
}

pub unsafe fn original_getgid() -> libc::gid_t {
    let f = *ORIGINAL_GETGID.get_or_init(|| {
        resolve(c"getgid").expect("libc always provides getgid")
    });
    f()
}

pub unsafe fn original_gethostname(name: *mut libc::c_char, len: libc::size_t) -> libc::c_int {
    let f = *ORIGINAL_GETHOSTNAME.get_or_init(|| {
        resolve(c"gethostname").expect("libc always provides gethostname")
    });
    f(name, len)
}

pub unsafe fn original_uname(buf: *mut libc::utsname) -> libc::c_int {
    let f = *ORIGINAL_UNAME.get_or_init(|| resolve(c"uname").expect("libc always provides uname"));
    f(buf)
}
