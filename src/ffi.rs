//! C-compatible FFI API for cross-language bindings.
//!
//! # ABI Contract
//!
//! All exported functions use `extern "C"` calling convention and `#[no_mangle]`
//! to ensure stable symbol names.
//!
//! ## Inputs
//! - `config_yaml`: the same YAML accepted by the CLI. Pass `NULL` (or a zero
//!   length) to use the defaults.
//! - `channels_csv`: channel list text. Both inputs are UTF-8 and need not be
//!   null-terminated.
//! - Logos are never drawn through the FFI; there is no base directory to
//!   resolve them against.
//!
//! ## Memory management
//! - Buffers returned by `chsheet_*` functions are allocated on the Rust heap.
//! - Callers **must** free them with `chsheet_free_buffer` / `chsheet_free_string`.
//! - Passing a null pointer to a free function is a no-op.
//!
//! ## Error handling
//! - Functions return a `c_int`: `0` success, `1` null pointer, `2` invalid
//!   UTF-8, `3` sheet generation failed.
//! - Error details can be retrieved via `chsheet_last_error`.
//!
//! ## Thread safety
//! - `chsheet_last_error` uses a thread-local, so it is safe to call from
//!   multiple threads.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;

use crate::config::SheetConfig;
use crate::logos::LogoLookup;
use crate::pipeline::{compute_plan, generate_sheet};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Borrow `len` bytes at `data` as UTF-8.
///
/// # Safety
/// `data` must be null or point to `len` readable bytes.
unsafe fn str_from_raw<'a>(data: *const u8, len: u32, what: &str) -> Result<&'a str, c_int> {
    if data.is_null() || len == 0 {
        return Ok("");
    }
    let bytes = slice::from_raw_parts(data, len as usize);
    std::str::from_utf8(bytes).map_err(|e| {
        set_last_error(&format!("{what}: invalid UTF-8: {e}"));
        2
    })
}

/// Decode both inputs and parse the config.
///
/// # Safety
/// Same pointer contract as [`str_from_raw`] for both pairs.
unsafe fn read_inputs<'a>(
    config_ptr: *const u8,
    config_len: u32,
    csv_ptr: *const u8,
    csv_len: u32,
) -> Result<(SheetConfig, &'a str), c_int> {
    let yaml = str_from_raw(config_ptr, config_len, "config")?;
    let csv = str_from_raw(csv_ptr, csv_len, "channels")?;
    let config = SheetConfig::from_yaml_str(yaml).map_err(|e| {
        set_last_error(&e.to_string());
        3
    })?;
    Ok((config, csv))
}

// ---------------------------------------------------------------------------
// Core API
// ---------------------------------------------------------------------------

/// Generate the channel sheet PDF.
///
/// # Parameters
/// - `config_ptr`, `config_len`: YAML config (may be null for defaults)
/// - `csv_ptr`, `csv_len`: channel list CSV
/// - `out_buf`: on success, receives a pointer to heap-allocated PDF bytes
/// - `out_len`: on success, receives the length of the PDF buffer
///
/// # Returns
/// `0` on success, non-zero on error. On error, call `chsheet_last_error`.
///
/// # Safety
/// - `config_ptr` must be null or point to `config_len` valid bytes.
/// - `csv_ptr` must point to `csv_len` valid bytes.
/// - `out_buf` and `out_len` must be valid pointers.
/// - The caller must free `*out_buf` by calling `chsheet_free_buffer`.
#[no_mangle]
pub unsafe extern "C" fn chsheet_generate_pdf(
    config_ptr: *const u8,
    config_len: u32,
    csv_ptr: *const u8,
    csv_len: u32,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if csv_ptr.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }

    let (config, csv) = match read_inputs(config_ptr, config_len, csv_ptr, csv_len) {
        Ok(inputs) => inputs,
        Err(rc) => return rc,
    };

    match generate_sheet(&config, csv, &LogoLookup::default()) {
        Ok(sheet) => {
            let len = sheet.pdf.len() as u32;
            let buf = sheet.pdf.into_boxed_slice();
            *out_buf = Box::into_raw(buf) as *mut u8;
            *out_len = len;
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            3
        }
    }
}

/// Compute only the placement plan (no PDF rendering). Returns JSON.
///
/// # Parameters
/// - `config_ptr`, `config_len`: YAML config (may be null for defaults)
/// - `csv_ptr`, `csv_len`: channel list CSV
/// - `out_json_ptr`: receives a pointer to a null-terminated JSON string
///
/// # Returns
/// `0` on success.
///
/// # Safety
/// Same as `chsheet_generate_pdf`. `*out_json_ptr` must be freed with
/// `chsheet_free_string`.
#[no_mangle]
pub unsafe extern "C" fn chsheet_compute_plan_json(
    config_ptr: *const u8,
    config_len: u32,
    csv_ptr: *const u8,
    csv_len: u32,
    out_json_ptr: *mut *mut c_char,
) -> c_int {
    if csv_ptr.is_null() || out_json_ptr.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }

    let (config, csv) = match read_inputs(config_ptr, config_len, csv_ptr, csv_len) {
        Ok(inputs) => inputs,
        Err(rc) => return rc,
    };

    let json = match compute_plan(&config, csv).and_then(|plan| plan.to_json()) {
        Ok(j) => j,
        Err(e) => {
            set_last_error(&e.to_string());
            return 3;
        }
    };

    match CString::new(json) {
        Ok(cs) => {
            *out_json_ptr = cs.into_raw();
            0
        }
        Err(_) => {
            set_last_error("JSON contained null byte");
            3
        }
    }
}

/// Free a buffer returned by `chsheet_generate_pdf`.
///
/// # Safety
/// `buf` and `len` must come from a single successful `chsheet_generate_pdf`.
#[no_mangle]
pub unsafe extern "C" fn chsheet_free_buffer(buf: *mut u8, len: u32) {
    if !buf.is_null() {
        let _ = Box::from_raw(ptr::slice_from_raw_parts_mut(buf, len as usize));
    }
}

/// Free a string returned by `chsheet_compute_plan_json`.
///
/// # Safety
/// `s` must have been returned by Rust's `CString::into_raw`.
#[no_mangle]
pub unsafe extern "C" fn chsheet_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Retrieve the last error message. Returns a null-terminated string.
///
/// The returned pointer is valid until the next `chsheet_*` call on the same
/// thread. The caller should **not** free this pointer.
///
/// Returns null if no error has occurred.
#[no_mangle]
pub extern "C" fn chsheet_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        match borrow.as_ref() {
            Some(cs) => cs.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Return the library version as a null-terminated string.
/// The caller must **not** free this pointer.
#[no_mangle]
pub extern "C" fn chsheet_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
