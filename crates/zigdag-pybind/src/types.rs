//! Emits `_types.py`: the record types and declaration-order id lists
//! (spec.md section 4.5's first three bullets).

use std::fmt::Write as _;

use crate::inputs::PyInput;

pub fn render(inputs: &[PyInput]) -> String {
    let mut out = String::new();
    writeln!(out, "# Generated from the JSON model. Do not edit by hand.").unwrap();
    writeln!(out, "from typing import List, Literal, TypedDict").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "class CalculateInputs(TypedDict, total=False):").unwrap();
    if inputs.is_empty() {
        writeln!(out, "    pass").unwrap();
    }
    for input in inputs {
        writeln!(out, "    {}: {}", input.id, input.row_type).unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "class CalculateBatchInputs(TypedDict, total=False):").unwrap();
    if inputs.is_empty() {
        writeln!(out, "    pass").unwrap();
    }
    for input in inputs {
        writeln!(out, "    {}: List[{}]", input.id, input.row_type).unwrap();
    }
    writeln!(out).unwrap();

    let all_ids: Vec<&str> = inputs.iter().map(|i| i.id.as_str()).collect();
    let numeric_ids: Vec<&str> = inputs.iter().filter(|i| i.numeric).map(|i| i.id.as_str()).collect();
    let string_ids: Vec<&str> = inputs.iter().filter(|i| !i.numeric).map(|i| i.id.as_str()).collect();

    write_id_tuple(&mut out, "INPUT_IDS", &all_ids);
    write_id_tuple(&mut out, "NUMERIC_INPUT_IDS", &numeric_ids);
    write_id_tuple(&mut out, "STRING_INPUT_IDS", &string_ids);

    out
}

fn write_id_tuple(out: &mut String, name: &str, ids: &[&str]) {
    let quoted: Vec<String> = ids.iter().map(|id| format!("{id:?}")).collect();
    let tuple_body = if quoted.len() == 1 {
        format!("{},", quoted[0])
    } else {
        quoted.join(", ")
    };
    writeln!(out, "{name}: tuple = ({tuple_body})").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_literal_and_plain_fields() {
        let inputs = vec![
            PyInput { id: "discount".into(), numeric: true, row_type: "float".into() },
            PyInput { id: "nome".into(), numeric: false, row_type: "Literal[\"tiago\", \"ben\"]".into() },
        ];
        let src = render(&inputs);
        assert!(src.contains("discount: float"));
        assert!(src.contains("nome: Literal[\"tiago\", \"ben\"]"));
        assert!(src.contains("NUMERIC_INPUT_IDS: tuple = (\"discount\",)"));
        assert!(src.contains("STRING_INPUT_IDS: tuple = (\"nome\",)"));
    }

    #[test]
    fn empty_inputs_render_pass() {
        let src = render(&[]);
        assert!(src.contains("pass"));
    }
}
