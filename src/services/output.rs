use crate::domain::models::JsonOut;
use serde::Serialize;

fn emit_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: true, data })?
    );
    Ok(())
}

/// Prints `data` as one JSON envelope, or one text row per item.
pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return emit_json(data);
    }
    for d in data {
        println!("{}", row(d));
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return emit_json(data);
    }
    println!("{}", row(&data));
    Ok(())
}

/// Created documents print as pretty JSON in both modes; `--json` wraps them
/// in the usual envelope.
pub fn print_document<T: Serialize>(json: bool, doc: T) -> anyhow::Result<()> {
    if json {
        return emit_json(doc);
    }
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
