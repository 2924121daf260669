use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings};
use crate::store;

pub fn run(data_dir: Option<String>, user: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    if let Some(user) = user {
        settings.user_name = user;
    }

    std::fs::create_dir_all(&settings.data_dir)?;
    let conn = get_connection(&PathBuf::from(&settings.data_dir).join("kasboek.db"))?;
    init_db(&conn)?;
    store::get_or_create_user(&conn, &settings.user_name)?;
    save_settings(&settings)?;

    println!("Initialized kasboek in {}", settings.data_dir);
    Ok(())
}
