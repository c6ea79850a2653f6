//! Emits `engine.py` (the ctypes wrapper) and its `.pyi` stub (spec.md
//! section 4.5's fourth and fifth bullets).

/// Rows beyond this count are split across multiple FFI calls so a single
/// `calculate_batch` invocation never builds one unbounded ctypes buffer
/// (spec.md section 4.5: "chunks its input at a fixed row count").
pub const BATCH_CHUNK_SIZE: usize = 1024;

pub fn render_module(package_name: &str) -> String {
    format!(
        r#"# Generated from the JSON model. Do not edit by hand.
import ctypes
import os
import sys

from ._types import CalculateBatchInputs, CalculateInputs, NUMERIC_INPUT_IDS, STRING_INPUT_IDS

_BATCH_CHUNK_SIZE = {chunk_size}

_STATUS_MESSAGES = {{
    -1: "batch input count does not match the compiled graph's arity",
    -2: "runtime evaluation failed (missing conditional mapping key)",
    -3: "unknown node id",
}}


class ZigDagError(RuntimeError):
    """Raised when the native {package_name} engine reports a non-zero status."""


def _check(status: int) -> None:
    if status != 0:
        raise ZigDagError(_STATUS_MESSAGES.get(status, "zigdag engine error (status %d)" % status))


def _library_name() -> str:
    if sys.platform == "darwin":
        return "libzigdag.dylib"
    if sys.platform == "win32":
        return "zigdag.dll"
    return "libzigdag.so"


def _load_library() -> ctypes.CDLL:
    here = os.path.dirname(os.path.abspath(__file__))
    lib_path = os.path.normpath(os.path.join(here, "..", "zigdag", _library_name()))
    if not os.path.exists(lib_path):
        raise OSError("{package_name}: shared library not found at %s" % lib_path)
    return ctypes.CDLL(lib_path)


class Engine:
    """Typed wrapper over the {package_name} graph's compiled C-ABI exports."""

    def __init__(self) -> None:
        self._lib = _load_library()
        self._bind_signatures()

    def _bind_signatures(self) -> None:
        lib = self._lib
        lib.set_input_node_value_num.argtypes = [ctypes.c_char_p, ctypes.c_double]
        lib.set_input_node_value_num.restype = ctypes.c_int
        lib.set_input_node_value_str.argtypes = [ctypes.c_char_p, ctypes.c_char_p]
        lib.set_input_node_value_str.restype = ctypes.c_int
        lib.calculate_final_node_price.argtypes = [ctypes.POINTER(ctypes.c_double)]
        lib.calculate_final_node_price.restype = ctypes.c_int
        lib.calculate_node_price.argtypes = [ctypes.c_char_p, ctypes.POINTER(ctypes.c_double)]
        lib.calculate_node_price.restype = ctypes.c_int
        lib.get_node_count.argtypes = []
        lib.get_node_count.restype = ctypes.c_int
        lib.calculate_final_node_price_batch.argtypes = [
            ctypes.POINTER(ctypes.c_double),
            ctypes.POINTER(ctypes.c_char_p),
            ctypes.c_int,
            ctypes.c_int,
            ctypes.c_int,
            ctypes.POINTER(ctypes.c_double),
        ]
        lib.calculate_final_node_price_batch.restype = ctypes.c_int

    def set_input_num(self, node_id: str, value: float) -> None:
        _check(self._lib.set_input_node_value_num(node_id.encode("utf-8"), ctypes.c_double(value)))

    def set_input_str(self, node_id: str, value: str) -> None:
        _check(self._lib.set_input_node_value_str(node_id.encode("utf-8"), value.encode("utf-8")))

    def calculate(self, **kwargs: "CalculateInputs") -> float:
        for node_id in NUMERIC_INPUT_IDS:
            if node_id in kwargs:
                self.set_input_num(node_id, float(kwargs[node_id]))
        for node_id in STRING_INPUT_IDS:
            if node_id in kwargs:
                self.set_input_str(node_id, str(kwargs[node_id]))
        out = ctypes.c_double()
        _check(self._lib.calculate_final_node_price(ctypes.byref(out)))
        return out.value

    def calculate_node(self, node_id: str) -> float:
        out = ctypes.c_double()
        _check(self._lib.calculate_node_price(node_id.encode("utf-8"), ctypes.byref(out)))
        return out.value

    def calculate_batch(self, rows: "CalculateBatchInputs") -> "list[float]":
        numeric_columns = [rows.get(node_id, []) for node_id in NUMERIC_INPUT_IDS]
        string_columns = [rows.get(node_id, []) for node_id in STRING_INPUT_IDS]
        num_rows = 0
        if numeric_columns and numeric_columns[0]:
            num_rows = len(numeric_columns[0])
        elif string_columns and string_columns[0]:
            num_rows = len(string_columns[0])

        results: "list[float]" = []
        for start in range(0, num_rows, _BATCH_CHUNK_SIZE):
            end = min(start + _BATCH_CHUNK_SIZE, num_rows)
            chunk_len = end - start
            results.extend(self._calculate_chunk(numeric_columns, string_columns, start, chunk_len))
        return results

    def _calculate_chunk(self, numeric_columns, string_columns, start: int, chunk_len: int) -> "list[float]":
        n_numeric = len(NUMERIC_INPUT_IDS)
        n_string = len(STRING_INPUT_IDS)

        num_vals = (ctypes.c_double * (n_numeric * chunk_len))()
        for col, values in enumerate(numeric_columns):
            for row in range(chunk_len):
                num_vals[row * n_numeric + col] = float(values[start + row])

        str_vals = (ctypes.c_char_p * (n_string * chunk_len))()
        for col, values in enumerate(string_columns):
            for row in range(chunk_len):
                str_vals[row * n_string + col] = str(values[start + row]).encode("utf-8")

        out = (ctypes.c_double * chunk_len)()
        _check(
            self._lib.calculate_final_node_price_batch(
                num_vals, str_vals, n_numeric, n_string, chunk_len, out
            )
        )
        return list(out)

    def node_count(self) -> int:
        return self._lib.get_node_count()
"#,
        chunk_size = BATCH_CHUNK_SIZE,
        package_name = package_name,
    )
}

pub fn render_stub() -> String {
    r#"# Generated from the JSON model. Do not edit by hand.
from ._types import CalculateBatchInputs, CalculateInputs

class ZigDagError(RuntimeError): ...

class Engine:
    def __init__(self) -> None: ...
    def set_input_num(self, node_id: str, value: float) -> None: ...
    def set_input_str(self, node_id: str, value: str) -> None: ...
    def calculate(self, **kwargs: object) -> float: ...
    def calculate_node(self, node_id: str) -> float: ...
    def calculate_batch(self, rows: CalculateBatchInputs) -> "list[float]": ...
    def node_count(self) -> int: ...
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_references_chunk_size_and_package_name() {
        let src = render_module("openpricing_demo");
        assert!(src.contains("_BATCH_CHUNK_SIZE = 1024"));
        assert!(src.contains("openpricing_demo"));
        assert!(src.contains("class Engine"));
    }

    #[test]
    fn stub_declares_public_surface() {
        let src = render_stub();
        assert!(src.contains("def calculate_batch"));
        assert!(src.contains("def node_count"));
    }
}
