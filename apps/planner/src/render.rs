//! # Rendering
//!
//! Turns a `ShoppingList` into what the planner prints on stdout.
//!
//! ## Table Layout
//! ```text
//! Ingrediente        Categoría  Cantidad  Unidad
//! ─────────────────  ─────────  ────────  ─────────────
//! Hielo (Bolsa 3kg)  hielo            25  bolsa
//! Ron blanco         licores          53  botella 750ml
//!
//! Bebidas estimadas: 600
//!
//! Warnings:
//!   - Cocktail paloma has no recipe lines
//! ```

use barra_core::ShoppingList;

use crate::config::OutputFormat;
use crate::error::PlannerResult;

const HEADERS: [&str; 4] = ["Ingrediente", "Categoría", "Cantidad", "Unidad"];

/// Renders a list in the requested format.
pub fn render(list: &ShoppingList, format: OutputFormat) -> PlannerResult<String> {
    match format {
        OutputFormat::Json => render_json(list),
        OutputFormat::Table => Ok(render_table(list)),
    }
}

/// Pretty-printed JSON, the same shape the website consumes.
pub fn render_json(list: &ShoppingList) -> PlannerResult<String> {
    Ok(serde_json::to_string_pretty(list)?)
}

/// Aligned text table with a total and a warnings footer.
pub fn render_table(list: &ShoppingList) -> String {
    let rows: Vec<[String; 4]> = list
        .items
        .iter()
        .map(|item| {
            [
                item.ingredient_name.clone(),
                item.category.clone(),
                item.total_quantity.to_string(),
                item.purchase_unit.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    push_row(&mut out, &widths.map(|w| "─".repeat(w)), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    out.push_str(&format!("\nBebidas estimadas: {}\n", list.total_drinks));

    if !list.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in &list.warnings {
            out.push_str(&format!("  - {}\n", warning));
        }
    }

    out
}

/// Quantity column is right-aligned, the rest left-aligned.
fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let pad = width.saturating_sub(cell.chars().count());
        if i > 0 {
            line.push_str("  ");
        }
        if i == 2 {
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
