//! C-ABI boundary for the specialized executor (spec.md section 4.4).
//!
//! The non-batch path keeps one [`zigdag_specialize::Executor`] per calling
//! OS thread (`thread_local!`), giving concurrent callers isolation without
//! locking (spec.md section 5). The batch path allocates a fresh executor
//! per call and is therefore reentrant.
//!
//! Status codes follow spec.md sections 4.4/7: `0` success, `-1` batch
//! arity mismatch, `-2` runtime evaluation failure, `-3` unknown node id.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::slice;
use std::sync::OnceLock;

use zigdag_specialize::{
    Executor, ExecError, InputKind, FUNNEL_INDEX, INPUT_KIND, NODE_COUNT, NODE_IDS,
    NUMERIC_INPUT_IDS, STRING_INPUT_IDS,
};

pub const STATUS_OK: c_int = 0;
pub const STATUS_ARITY_MISMATCH: c_int = -1;
pub const STATUS_EVAL_FAILURE: c_int = -2;
pub const STATUS_UNKNOWN_ID: c_int = -3;

/// `{ id: *const c_char, type: c_int, index: c_int }` -- `type` 0 = numeric,
/// 1 = string; `index` is the position within its type class, used by the
/// batch call to locate its column in the flat input arrays (spec.md
/// section 4.4).
#[repr(C)]
pub struct InputMeta {
    pub id: *const c_char,
    pub r#type: c_int,
    pub index: c_int,
}

thread_local! {
    static EXECUTOR: RefCell<Executor> = RefCell::new(Executor::new());
}

fn node_id_cstrings() -> &'static [CString] {
    static CACHE: OnceLock<Vec<CString>> = OnceLock::new();
    CACHE.get_or_init(|| {
        NODE_IDS
            .iter()
            .map(|s| CString::new(*s).expect("node ids must not contain NUL"))
            .collect()
    })
}

/// Reads a caller-owned, NUL-terminated C string. Returns `None` for a
/// null pointer or invalid UTF-8, both treated as "unknown id" by callers.
unsafe fn read_cstr<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn status_for_exec_error(err: &ExecError) -> c_int {
    match err {
        ExecError::UnknownInput { .. } => STATUS_UNKNOWN_ID,
        ExecError::MappingNotFound { .. } => STATUS_EVAL_FAILURE,
    }
}

/// Sets a `dynamic_input_num` node's value on the calling thread's executor.
#[no_mangle]
pub unsafe extern "C" fn set_input_node_value_num(id: *const c_char, value: f64) -> c_int {
    let id = match read_cstr(id) {
        Some(s) => s,
        None => return STATUS_UNKNOWN_ID,
    };
    EXECUTOR.with(|e| match e.borrow_mut().set_input_num(id, value) {
        Ok(()) => STATUS_OK,
        Err(err) => {
            tracing::debug!(%id, ?err, "set_input_node_value_num failed");
            status_for_exec_error(&err)
        }
    })
}

/// Sets a `dynamic_input_str` node's value on the calling thread's executor.
#[no_mangle]
pub unsafe extern "C" fn set_input_node_value_str(
    id: *const c_char,
    value: *const c_char,
) -> c_int {
    let id = match read_cstr(id) {
        Some(s) => s,
        None => return STATUS_UNKNOWN_ID,
    };
    let value = match read_cstr(value) {
        Some(s) => s,
        None => return STATUS_UNKNOWN_ID,
    };
    EXECUTOR.with(|e| match e.borrow_mut().set_input_str(id, value) {
        Ok(()) => STATUS_OK,
        Err(err) => {
            tracing::debug!(%id, ?err, "set_input_node_value_str failed");
            status_for_exec_error(&err)
        }
    })
}

/// Evaluates and writes the funnel node's result to `*out`.
#[no_mangle]
pub unsafe extern "C" fn calculate_final_node_price(out: *mut f64) -> c_int {
    EXECUTOR.with(|e| match e.borrow_mut().get_output() {
        Ok(value) => {
            *out = value;
            STATUS_OK
        }
        Err(err) => {
            tracing::debug!(?err, "calculate_final_node_price failed");
            status_for_exec_error(&err)
        }
    })
}

/// Evaluates and writes any node's result to `*out` (introspection).
#[no_mangle]
pub unsafe extern "C" fn calculate_node_price(id: *const c_char, out: *mut f64) -> c_int {
    let id = match read_cstr(id) {
        Some(s) => s,
        None => return STATUS_UNKNOWN_ID,
    };
    EXECUTOR.with(|e| match e.borrow_mut().get_output_by_id(id) {
        Ok(value) => {
            *out = value;
            STATUS_OK
        }
        Err(err) => {
            tracing::debug!(%id, ?err, "calculate_node_price failed");
            status_for_exec_error(&err)
        }
    })
}

/// Total node count in the graph.
#[no_mangle]
pub extern "C" fn get_node_count() -> i32 {
    NODE_COUNT as i32
}

/// Writes the declaration-order id of node `index` into `buf` (up to
/// `buflen` bytes, NUL-terminated). Returns the id's length, or a negative
/// status if `index` is out of range or `buf` is too small.
#[no_mangle]
pub unsafe extern "C" fn get_node_id(index: i32, buf: *mut u8, buflen: i32) -> i32 {
    if index < 0 || index as usize >= NODE_COUNT {
        return STATUS_UNKNOWN_ID;
    }
    let cstrs = node_id_cstrings();
    let bytes = cstrs[index as usize].as_bytes_with_nul();
    if buflen < 0 || bytes.len() > buflen as usize {
        return STATUS_ARITY_MISMATCH;
    }
    let dest = slice::from_raw_parts_mut(buf, bytes.len());
    dest.copy_from_slice(bytes);
    (bytes.len() - 1) as i32
}

/// `1` if `id` names a dynamic input, `0` if it names a node that is not a
/// dynamic input, `-1` if `id` is unknown.
#[no_mangle]
pub unsafe extern "C" fn is_dynamic_input(id: *const c_char) -> i32 {
    let id = match read_cstr(id) {
        Some(s) => s,
        None => return -1,
    };
    match NODE_IDS.iter().position(|&s| s == id) {
        None => -1,
        Some(idx) => match INPUT_KIND[idx] {
            InputKind::Numeric | InputKind::StringKind => 1,
            InputKind::NotInput => 0,
        },
    }
}

/// Writes up to `max` dynamic-input ids (declaration order, `NUL`-
/// terminated, each truncated to `each_len` bytes) into `bufs[0..count]`.
/// Returns the count written.
#[no_mangle]
pub unsafe extern "C" fn get_dynamic_inputs(bufs: *mut *mut u8, each_len: i32, max: i32) -> i32 {
    if each_len <= 0 || max <= 0 {
        return 0;
    }
    let cstrs = node_id_cstrings();
    let mut written = 0i32;
    for (idx, kind) in INPUT_KIND.iter().enumerate() {
        if written >= max {
            break;
        }
        if matches!(kind, InputKind::NotInput) {
            continue;
        }
        let bytes = cstrs[idx].as_bytes_with_nul();
        let n = bytes.len().min(each_len as usize);
        let dest_ptr = *bufs.offset(written as isize);
        let dest = slice::from_raw_parts_mut(dest_ptr, n);
        dest.copy_from_slice(&bytes[..n]);
        written += 1;
    }
    written
}

/// Number of dynamic inputs (numeric + string).
#[no_mangle]
pub extern "C" fn get_input_count() -> i32 {
    (NUMERIC_INPUT_IDS.len() + STRING_INPUT_IDS.len()) as i32
}

/// Fills `*out` with the metadata of the `index`-th dynamic input (numeric
/// inputs first, in declaration order, then string inputs).
#[no_mangle]
pub unsafe extern "C" fn get_input_meta(index: i32, out: *mut InputMeta) -> c_int {
    if index < 0 {
        return STATUS_UNKNOWN_ID;
    }
    let index = index as usize;
    let cstrs = node_id_cstrings();
    let numeric_count = NUMERIC_INPUT_IDS.len();
    let string_count = STRING_INPUT_IDS.len();

    if index < numeric_count {
        let node_idx = NODE_IDS
            .iter()
            .position(|&s| s == NUMERIC_INPUT_IDS[index])
            .unwrap();
        *out = InputMeta {
            id: cstrs[node_idx].as_ptr(),
            r#type: 0,
            index: index as c_int,
        };
        STATUS_OK
    } else if index < numeric_count + string_count {
        let local = index - numeric_count;
        let node_idx = NODE_IDS
            .iter()
            .position(|&s| s == STRING_INPUT_IDS[local])
            .unwrap();
        *out = InputMeta {
            id: cstrs[node_idx].as_ptr(),
            r#type: 1,
            index: local as c_int,
        };
        STATUS_OK
    } else {
        STATUS_UNKNOWN_ID
    }
}

/// Batched evaluation: for each row in `[0, num_rows)`, walks the
/// compile-time-known dynamic-input list in declaration order, reading the
/// next numeric/string cell, evaluates on a fresh stack-local executor, and
/// writes `out[row]` (spec.md section 4.4's batching algorithm).
///
/// # Safety
/// `num_vals` must point to at least `num_numeric * num_rows` valid
/// `f64`s; `str_vals` to at least `num_string * num_rows` valid, non-null
/// C strings; `out` to at least `num_rows` writable `f64`s.
#[no_mangle]
pub unsafe extern "C" fn calculate_final_node_price_batch(
    num_vals: *const f64,
    str_vals: *const *const c_char,
    num_numeric: i32,
    num_string: i32,
    num_rows: i32,
    out: *mut f64,
) -> c_int {
    if num_numeric as usize != NUMERIC_INPUT_IDS.len() || num_string as usize != STRING_INPUT_IDS.len() {
        return STATUS_ARITY_MISMATCH;
    }
    if num_rows <= 0 {
        return STATUS_OK;
    }

    let num_numeric = num_numeric as usize;
    let num_string = num_string as usize;
    let num_rows = num_rows as usize;

    let num_vals = slice::from_raw_parts(num_vals, num_numeric * num_rows);
    let str_vals = if num_string > 0 {
        slice::from_raw_parts(str_vals, num_string * num_rows)
    } else {
        &[]
    };
    let out = slice::from_raw_parts_mut(out, num_rows);

    for row in 0..num_rows {
        let mut exec = Executor::new();
        for col in 0..num_numeric {
            let id = NUMERIC_INPUT_IDS[col];
            let value = num_vals[row * num_numeric + col];
            if let Err(err) = exec.set_input_num(id, value) {
                tracing::debug!(row, %id, ?err, "batch set_input_num failed");
                return status_for_exec_error(&err);
            }
        }
        for col in 0..num_string {
            let id = STRING_INPUT_IDS[col];
            let cptr = str_vals[row * num_string + col];
            let value = match read_cstr(cptr) {
                Some(s) => s,
                None => return STATUS_UNKNOWN_ID,
            };
            if let Err(err) = exec.set_input_str(id, value) {
                tracing::debug!(row, %id, ?err, "batch set_input_str failed");
                return status_for_exec_error(&err);
            }
        }
        match exec.get_output() {
            Ok(value) => out[row] = value,
            Err(err) => {
                tracing::debug!(row, ?err, "batch evaluation failed");
                return status_for_exec_error(&err);
            }
        }
    }

    STATUS_OK
}

/// Installs a `tracing` subscriber reading `RUST_LOG`, for hosts that want
/// the FFI layer's diagnostics without bringing up their own subscriber.
/// Safe to call more than once; subsequent calls are no-ops.
#[no_mangle]
pub extern "C" fn zigdag_init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn reset_executor() {
        EXECUTOR.with(|e| *e.borrow_mut() = Executor::new());
    }

    #[test]
    fn single_shot_scenario_1() {
        reset_executor();
        unsafe {
            let nome = CString::new("nome").unwrap();
            let tiago = CString::new("tiago").unwrap();
            let discount = CString::new("discount").unwrap();
            assert_eq!(
                set_input_node_value_str(nome.as_ptr(), tiago.as_ptr()),
                STATUS_OK
            );
            assert_eq!(set_input_node_value_num(discount.as_ptr(), 10.0), STATUS_OK);
            let mut out = 0.0f64;
            assert_eq!(calculate_final_node_price(&mut out as *mut f64), STATUS_OK);
            assert_eq!(out, 5000.0);
        }
    }

    #[test]
    fn batch_matches_single_shot() {
        // Property 5: batch equivalence, using scenario 4's three rows.
        let numeric: [f64; 3] = [10.0, 20.0, 5.0];
        let names = ["tiago", "zefaria", "test"];
        let name_cstrs: Vec<CString> = names.iter().map(|n| CString::new(*n).unwrap()).collect();
        let str_ptrs: Vec<*const c_char> = name_cstrs.iter().map(|c| c.as_ptr()).collect();
        let mut out = [0.0f64; 3];
        unsafe {
            let status = calculate_final_node_price_batch(
                numeric.as_ptr(),
                str_ptrs.as_ptr(),
                1,
                1,
                3,
                out.as_mut_ptr(),
            );
            assert_eq!(status, STATUS_OK);
        }
        assert_eq!(out, [5000.0, 3500.0, 8000.0]);
    }

    #[test]
    fn batch_arity_mismatch_is_rejected() {
        let numeric: [f64; 1] = [10.0];
        let mut out = [0.0f64; 1];
        unsafe {
            let status = calculate_final_node_price_batch(
                numeric.as_ptr(),
                std::ptr::null(),
                1,
                0, // wrong: this graph has one string input
                1,
                out.as_mut_ptr(),
            );
            assert_eq!(status, STATUS_ARITY_MISMATCH);
        }
    }

    #[test]
    fn get_node_count_matches_model() {
        assert_eq!(get_node_count(), NODE_COUNT as i32);
    }

    #[test]
    fn is_dynamic_input_reports_correctly() {
        unsafe {
            let discount = CString::new("discount").unwrap();
            let out = CString::new("out").unwrap();
            let missing = CString::new("does_not_exist").unwrap();
            assert_eq!(is_dynamic_input(discount.as_ptr()), 1);
            assert_eq!(is_dynamic_input(out.as_ptr()), 0);
            assert_eq!(is_dynamic_input(missing.as_ptr()), -1);
        }
    }

    #[test]
    fn input_meta_roundtrips_ids() {
        unsafe {
            let mut meta = InputMeta {
                id: std::ptr::null(),
                r#type: -1,
                index: -1,
            };
            assert_eq!(get_input_meta(0, &mut meta as *mut InputMeta), STATUS_OK);
            let id = CStr::from_ptr(meta.id).to_str().unwrap();
            assert_eq!(id, NUMERIC_INPUT_IDS[0]);
            assert_eq!(meta.r#type, 0);
        }
    }
}
