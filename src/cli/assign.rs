use crate::categorizer;
use crate::db::get_connection;
use crate::error::{KasboekError, Result};
use crate::settings::{get_data_dir, load_settings};
use crate::store;

pub fn run(code: &str, category: &str, user: &Option<String>) -> Result<()> {
    let settings = load_settings();
    let conn = get_connection(&get_data_dir().join("kasboek.db"))?;
    let user_name = user.clone().unwrap_or(settings.user_name);
    let user_id = store::get_or_create_user(&conn, &user_name)?;

    let transaction = store::find_by_code(&conn, user_id, code)?
        .ok_or_else(|| KasboekError::Other(format!("no transaction with code {code}")))?;
    let transaction_id = transaction
        .id
        .ok_or_else(|| KasboekError::Other("transaction has no id".to_string()))?;
    let category_id = store::category_id_by_name(&conn, category)?;

    let event = store::assign_category(&conn, transaction_id, Some(category_id))?;
    let outcome = categorizer::handle_save(&conn, &event)?;

    println!(
        "Assigned '{category}', {} similar transactions followed",
        outcome.backfilled
    );
    Ok(())
}
