//! End-to-end scenarios through the public facade.

use anyhow::Result;
use pretty_assertions::assert_eq;

use tabula::{Position, Sheet, SheetError, Size, Value};

fn pos(text: &str) -> Position {
    Position::from_text(text)
}

#[test]
fn test_recalculation_after_parent_change() -> Result<()> {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "5")?;
    sheet.set_cell(pos("A2"), "=A1*2")?;
    assert_eq!(sheet.cell_value(pos("A2"))?, Some(Value::Number(10.0)));

    sheet.set_cell(pos("A1"), "7")?;
    assert_eq!(sheet.cell_value(pos("A2"))?, Some(Value::Number(14.0)));
    Ok(())
}

#[test]
fn test_self_reference_leaves_cell_empty() -> Result<()> {
    let mut sheet = Sheet::new();
    let err = sheet.set_cell(pos("A1"), "=A1").unwrap_err();
    assert!(matches!(err, SheetError::CircularDependency(_)));
    assert!(sheet.get_cell(pos("A1"))?.is_none_or(|cell| cell.is_empty()));
    Ok(())
}

#[test]
fn test_reference_to_unset_cell() -> Result<()> {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("B2"), "=C3")?;
    let c3 = sheet.get_cell(pos("C3"))?.expect("referenced cell must exist");
    assert_eq!(c3.text(), "");
    assert_eq!(sheet.cell_value(pos("B2"))?, Some(Value::Number(0.0)));
    Ok(())
}

#[test]
fn test_printable_area_with_gap() -> Result<()> {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "x")?;
    sheet.set_cell(pos("C1"), "y")?;
    assert_eq!(sheet.printable_size(), Size { rows: 1, cols: 3 });

    let mut out = Vec::new();
    sheet.print_texts(&mut out)?;
    assert_eq!(String::from_utf8(out)?, "x\t\ty\n");
    Ok(())
}

#[test]
fn test_text_conventions() -> Result<()> {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'=not a formula")?;
    sheet.set_cell(pos("A2"), "=")?;
    sheet.set_cell(pos("A3"), "= 1 + 2 * 3")?;

    assert_eq!(sheet.cell_text(pos("A1"))?.as_deref(), Some("'=not a formula"));
    assert_eq!(
        sheet.cell_value(pos("A1"))?,
        Some(Value::Text("=not a formula".into()))
    );
    assert_eq!(sheet.cell_value(pos("A2"))?, Some(Value::Text("=".into())));
    assert_eq!(sheet.cell_text(pos("A3"))?.as_deref(), Some("=1+2*3"));
    assert_eq!(sheet.cell_value(pos("A3"))?, Some(Value::Number(7.0)));
    Ok(())
}

#[test]
fn test_full_table_render() -> Result<()> {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "2")?;
    sheet.set_cell(pos("B1"), "3")?;
    sheet.set_cell(pos("C2"), "=A1/B1")?;
    sheet.set_cell(pos("A3"), "=C2*0+A1/0")?;

    assert_eq!(sheet.render_texts(), "2\t3\t\n\t\t=A1/B1\n=C2*0+A1/0\t\t\n");
    assert_eq!(sheet.render_values(), "2\t3\t\n\t\t0.666667\n#DIV/0!\t\t\n");

    sheet.clear_cell(pos("A3"))?;
    assert_eq!(sheet.printable_size(), Size { rows: 2, cols: 3 });
    Ok(())
}
