use crate::categorizer::categorize_uncategorized;
use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{get_data_dir, load_settings};
use crate::store;

pub fn run(user: &Option<String>) -> Result<()> {
    let settings = load_settings();
    let conn = get_connection(&get_data_dir().join("kasboek.db"))?;
    let user_name = user.clone().unwrap_or(settings.user_name);
    let user_id = store::get_or_create_user(&conn, &user_name)?;

    let result = categorize_uncategorized(&conn, user_id)?;
    println!(
        "{} categorized, {} still uncategorized",
        result.categorized, result.still_uncategorized
    );
    Ok(())
}
