use fltk::text::TextBuffer;

/// Copy the whole text of an FLTK `TextBuffer` into a `String`.
///
/// `TextBuffer::text()` in fltk-rs copies FLTK's `malloc()`'d C string but
/// never frees it, leaking the full buffer size on every call. The editing
/// surface reads the buffer on every keystroke, so go through the C API and
/// release the allocation ourselves.
pub fn buffer_text(buf: &TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: `buf.as_ptr()` is the live FLTK buffer owned by `buf`.
    // Fl_Text_Buffer_text returns a NUL-terminated malloc'd copy (or null),
    // which is read once and then released with the matching free().
    unsafe {
        let ptr = Fl_Text_Buffer_text(buf.as_ptr() as *mut std::ffi::c_void);
        if ptr.is_null() {
            return String::new();
        }
        let text = std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        text
    }
}
