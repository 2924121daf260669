use std::path::PathBuf;

use crate::db::get_connection;
use crate::error::Result;
use crate::importer::import_file;
use crate::settings::{get_data_dir, load_settings};
use crate::store;

pub fn run(file: &str, user: &Option<String>) -> Result<()> {
    let settings = load_settings();
    let conn = get_connection(&get_data_dir().join("kasboek.db"))?;
    let user_name = user.clone().unwrap_or(settings.user_name);
    let user_id = store::get_or_create_user(&conn, &user_name)?;

    let result = import_file(&conn, &PathBuf::from(file), user_id)?;

    println!(
        "{} imported, {} duplicates skipped, {} faulty rows",
        result.successful, result.duplicate, result.faulty
    );
    Ok(())
}
