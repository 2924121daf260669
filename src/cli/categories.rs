use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;
use crate::store;

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("kasboek.db"))?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Description"]);
    for category in store::all_categories(&conn)? {
        table.add_row(vec![
            Cell::new(category.id),
            Cell::new(&category.name),
            Cell::new(category.description.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn add(name: &str, description: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("kasboek.db"))?;
    store::create_category(&conn, name, description)?;
    println!("Added category '{name}'");
    Ok(())
}
