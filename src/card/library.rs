use std::path::Path;

/// The external card parser.
///
/// Status-returning calls report the library's nonzero code as `Err`.
/// String-returning calls yield `None` where the library returns null.
pub trait CardLibrary {
    /// Parse and validate the card at `path`.
    fn validate(&self, path: &Path) -> Result<(), i32>;
    /// The card's formatted name.
    fn name(&self, path: &Path) -> Option<String>;
    /// Newline-delimited `Key: Value` summary of the card.
    fn details(&self, path: &Path) -> Option<String>;
    /// Replace the card's name and write the card back in place.
    fn update_name(&self, path: &Path, new_name: &str) -> Result<(), i32>;
}

#[cfg(unix)]
pub use native::NativeLibrary;

#[cfg(unix)]
mod native {
    use std::ffi::{CStr, CString, c_char, c_int, c_void};
    use std::os::unix::ffi::OsStrExt;
    use std::path::{Path, PathBuf};

    use log::{debug, info};

    use super::CardLibrary;
    use crate::card::CardError;

    type ValidateFn = unsafe extern "C" fn(*const c_char) -> c_int;
    type GetTextFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
    type UpdateNameFn = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;

    /// Card library loaded from a shared object at runtime.
    pub struct NativeLibrary {
        validate: ValidateFn,
        get_name: GetTextFn,
        get_details: GetTextFn,
        update_name: UpdateNameFn,
        // Dropped last so the function pointers never dangle.
        _handle: DlHandle,
    }

    /// Owned dlopen handle, closed on drop.
    struct DlHandle(*mut c_void);

    impl Drop for DlHandle {
        fn drop(&mut self) {
            // SAFETY: the handle came from a successful dlopen and is closed once.
            unsafe { libc::dlclose(self.0) };
        }
    }

    impl NativeLibrary {
        /// Load the shared object at `path` and resolve every entry point.
        pub fn load(path: &Path) -> Result<Self, CardError> {
            let c_path = path_to_cstring(path)?;
            // SAFETY: c_path is a valid NUL-terminated string for the call's duration.
            let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
            if handle.is_null() {
                return Err(CardError::LibraryLoad {
                    path: path.to_path_buf(),
                    reason: last_dl_error(),
                });
            }

            let handle = DlHandle(handle);

            let validate = resolve(&handle, path, c"validate_vcard")?;
            let get_name = resolve(&handle, path, c"get_vcard_name")?;
            let get_details = resolve(&handle, path, c"get_vcard_details")?;
            let update_name = resolve(&handle, path, c"update_vcard_name")?;

            info!(
                "event=library_load module=card status=ok path={}",
                path.display()
            );

            // SAFETY: the symbols are the library's exported C functions with
            // exactly these signatures.
            unsafe {
                Ok(NativeLibrary {
                    validate: std::mem::transmute::<*mut c_void, ValidateFn>(validate),
                    get_name: std::mem::transmute::<*mut c_void, GetTextFn>(get_name),
                    get_details: std::mem::transmute::<*mut c_void, GetTextFn>(get_details),
                    update_name: std::mem::transmute::<*mut c_void, UpdateNameFn>(update_name),
                    _handle: handle,
                })
            }
        }

        fn call_text(&self, f: GetTextFn, path: &Path) -> Option<String> {
            let c_path = path_to_cstring(path).ok()?;
            // SAFETY: f is a resolved library entry point taking a C string path.
            let raw = unsafe { f(c_path.as_ptr()) };
            if raw.is_null() {
                return None;
            }
            // SAFETY: the library returns a malloc'd NUL-terminated string that
            // the caller owns.
            let text = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
            unsafe { libc::free(raw.cast::<c_void>()) };
            Some(text)
        }
    }

    impl CardLibrary for NativeLibrary {
        fn validate(&self, path: &Path) -> Result<(), i32> {
            let c_path = path_to_cstring(path).map_err(|_| -1)?;
            // SAFETY: resolved entry point, valid C string argument.
            let code = unsafe { (self.validate)(c_path.as_ptr()) };
            if code == 0 {
                Ok(())
            } else {
                debug!(
                    "event=card_validate module=card status=error path={} code={}",
                    path.display(),
                    code
                );
                Err(code)
            }
        }

        fn name(&self, path: &Path) -> Option<String> {
            self.call_text(self.get_name, path)
        }

        fn details(&self, path: &Path) -> Option<String> {
            self.call_text(self.get_details, path)
        }

        fn update_name(&self, path: &Path, new_name: &str) -> Result<(), i32> {
            let c_path = path_to_cstring(path).map_err(|_| -1)?;
            let c_name = CString::new(new_name).map_err(|_| -1)?;
            // SAFETY: resolved entry point, both arguments are valid C strings.
            let code = unsafe { (self.update_name)(c_path.as_ptr(), c_name.as_ptr()) };
            if code == 0 { Ok(()) } else { Err(code) }
        }
    }

    fn resolve(handle: &DlHandle, path: &Path, name: &CStr) -> Result<*mut c_void, CardError> {
        // SAFETY: handle is a live dlopen handle and name is NUL-terminated.
        let sym = unsafe { libc::dlsym(handle.0, name.as_ptr()) };
        if sym.is_null() {
            Err(CardError::LibraryLoad {
                path: path.to_path_buf(),
                reason: format!("missing symbol {}", name.to_string_lossy()),
            })
        } else {
            Ok(sym)
        }
    }

    fn path_to_cstring(path: &Path) -> Result<CString, CardError> {
        CString::new(path.as_os_str().as_bytes()).map_err(|_| CardError::InvalidPath {
            path: PathBuf::from(path),
        })
    }

    fn last_dl_error() -> String {
        // SAFETY: dlerror returns null or a thread-local NUL-terminated message.
        let msg = unsafe { libc::dlerror() };
        if msg.is_null() {
            "unknown dlopen error".to_string()
        } else {
            unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
        }
    }

}
