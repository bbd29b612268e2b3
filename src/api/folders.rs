use anyhow::{anyhow, Result};

use crate::models::{Folder, FolderType};
use crate::store::Store;
use crate::time::now_iso;

fn default_icon(folder_type: FolderType) -> &'static str {
    match folder_type {
        FolderType::Chat => "message",
        FolderType::Memory => "activity",
        FolderType::ActionItem => "check-square",
    }
}

pub fn list_folders(store: &Store, folder_type: FolderType) -> Result<Vec<Folder>> {
    store.get_all_by("type", &folder_type.as_str())
}

pub fn create_folder(store: &Store, name: &str, folder_type: FolderType) -> Result<Folder> {
    let now = now_iso();
    let folder = Folder {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        icon: default_icon(folder_type).to_string(),
        color: Some("blue".to_string()),
        folder_type,
        created_at: now.clone(),
        updated_at: now,
    };
    store.put(&folder)?;
    Ok(folder)
}

pub fn update_folder(store: &Store, id: &str, name: &str, color: &str) -> Result<Folder> {
    let mut folder = store
        .get::<Folder>(id)?
        .ok_or_else(|| anyhow!("folder not found: {id}"))?;
    folder.name = name.to_string();
    folder.color = Some(color.to_string());
    folder.updated_at = now_iso();
    store.put(&folder)?;
    Ok(folder)
}

pub fn delete_folder(store: &Store, id: &str) -> Result<()> {
    store.delete::<Folder>(id)
}
