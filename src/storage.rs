// localStorage persistence gateway. One key, write-through, tolerant restore.

use crate::model::Snapshot;
use crate::util::clog;

// Key kept from earlier builds so existing saves keep restoring.
const STORAGE_KEY: &str = "doodleMapState";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// `None` means first run: no snapshot was ever written, so the caller shows
/// the map fully fit and centered. A present-but-damaged snapshot restores
/// field by field instead.
pub fn load() -> Option<Snapshot> {
    let raw = local_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => Some(Snapshot::merge_value(value)),
        Err(_) => {
            clog("stored snapshot is not JSON; restoring defaults");
            Some(Snapshot::default())
        }
    }
}

/// Best-effort: quota errors and private-mode refusals are ignored.
pub fn save(snapshot: &Snapshot) {
    let Some(store) = local_storage() else {
        return;
    };
    if let Ok(raw) = serde_json::to_string(snapshot) {
        let _ = store.set_item(STORAGE_KEY, &raw);
    }
}
